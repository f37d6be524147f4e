//! Till terminal front-end
//!
//! Line-oriented counter for staff: identify the customer, tally services,
//! show the total and confirm payment. Every error returns to the prompt.

use anyhow::Context;
use chrono::Local;
use std::env;
use std::io::{self, BufRead, Write};
use till_core::{models::Selections, money::display_amount, AppConfig, AppError};
use till_services::{FileCheckoutDesk, Interaction};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "till={},till_services={},till_core={}",
            log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// What to do after an interaction ends
enum Flow {
    Continue,
    Quit,
}

/// Prompt-and-answer helper over any input/output pair
struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Ask a question; `None` means input is exhausted
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", message.as_ref())
    }

    fn ask_quantity(&mut self, question: &str) -> io::Result<Option<u32>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(0));
            }
            match answer.parse::<u32>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.say("Please enter a whole number of 0 or more.")?,
            }
        }
    }
}

fn report<R: BufRead, W: Write>(console: &mut Console<R, W>, err: &AppError) -> io::Result<()> {
    if err.is_validation() {
        warn!("{}", err);
        console.say(format!("Warning: {}", err))
    } else {
        error!("{} ({})", err, err.error_code());
        console.say(format!("Error: {}", err))
    }
}

fn run_interaction<R: BufRead, W: Write>(
    desk: &mut FileCheckoutDesk,
    console: &mut Console<R, W>,
) -> io::Result<Flow> {
    let mut interaction = Interaction::new();

    console.say("")?;
    console.say("Customer Information")?;
    let Some(candidate) = console.ask("Enter Customer ID (leave blank if new, q to quit): ")? else {
        return Ok(Flow::Quit);
    };
    if candidate.eq_ignore_ascii_case("q") {
        return Ok(Flow::Quit);
    }

    let returning = !candidate.is_empty() && desk.directory().lookup(&candidate).is_some();
    let (name, contact) = if returning {
        (String::new(), String::new())
    } else {
        let Some(name) = console.ask("Customer Name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(contact) = console.ask("Contact Number: ")? else {
            return Ok(Flow::Quit);
        };
        (name, contact)
    };

    let profile = match desk.identify(&mut interaction, &candidate, &name, &contact) {
        Ok(profile) => profile,
        Err(e) => {
            report(console, &e)?;
            return Ok(Flow::Continue);
        }
    };
    if returning {
        console.say(format!("Welcome back, {}!", profile.name))?;
        console.say(format!("Contact Number on file: {}", profile.contact))?;
        let Some(new_contact) = console.ask("New Contact Number (leave blank to keep): ")? else {
            return Ok(Flow::Quit);
        };
        if !new_contact.is_empty() && new_contact != profile.contact {
            match desk.update_customer(&profile.id, &profile.name, &new_contact) {
                Ok(updated) => console.say(format!("Contact Number updated to {}", updated.contact))?,
                Err(e) => report(console, &e)?,
            }
        }
    } else {
        console.say(format!("New customer added with ID: {}", profile.id))?;
    }

    console.say("")?;
    console.say("Select the services you used:")?;
    let services: Vec<(String, String)> = desk
        .billing()
        .catalog()
        .iter()
        .map(|e| (e.name.clone(), display_amount(e.unit_price)))
        .collect();

    let mut selections = Selections::new();
    for (service, price) in services {
        let question = format!("How many times did you use {}? ({} per use): ", service, price);
        let Some(quantity) = console.ask_quantity(&question)? else {
            return Ok(Flow::Quit);
        };
        selections.insert(service, quantity);
    }

    let bill = match desk.quote(&selections) {
        Ok(bill) => bill,
        Err(e) => {
            report(console, &e)?;
            return Ok(Flow::Continue);
        }
    };

    console.say("")?;
    if bill.has_selections() {
        console.say("Services Selected:")?;
        for line in &bill.lines {
            console.say(format!(
                "- {} ({} per use) - {} times - Total: {}",
                line.service,
                display_amount(line.unit_price),
                line.quantity,
                display_amount(line.line_total)
            ))?;
        }
    } else {
        console.say("No services selected.")?;
    }
    console.say(format!("Flat Fee: {}", display_amount(bill.flat_fee)))?;
    console.say(format!("Total Amount to Pay: {}", display_amount(bill.total)))?;

    let Some(answer) = console.ask("Confirm payment? [y/N]: ")? else {
        return Ok(Flow::Quit);
    };
    if !answer.eq_ignore_ascii_case("y") {
        console.say("Payment not confirmed.")?;
        return Ok(Flow::Continue);
    }

    match desk.confirm(&mut interaction, &selections, Local::now().naive_local()) {
        Ok(confirmation) => {
            console.say(format!(
                "Payment of {} confirmed for {}. Thank you!",
                display_amount(confirmation.record.total),
                confirmation.record.customer.name
            ))?;
            console.say(format!("Receipt saved to {}", confirmation.receipt_location))?;
        }
        Err(e) => report(console, &e)?,
    }

    Ok(Flow::Continue)
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting Till v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("failed to load configuration")?;
    let mut desk = FileCheckoutDesk::from_config(&config).context("invalid billing configuration")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console {
        input: stdin.lock(),
        output: stdout.lock(),
    };

    console.say(&config.shop.title)?;
    if let Some(warning) = desk.take_load_warning() {
        console.say(format!("Warning: customer data could not be read ({}). Resetting the data.", warning))?;
    }

    while let Flow::Continue = run_interaction(&mut desk, &mut console)? {}

    info!("Till stopped");
    Ok(())
}
