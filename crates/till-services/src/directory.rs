//! Customer directory service
//!
//! Owns the in-memory map from customer id to profile, resolves returning
//! customers, mints ids for new ones and writes the full map back to its
//! store on request.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use till_core::{
    models::{CustomerDetails, CustomerId, CustomerMap, CustomerProfile},
    traits::CustomerStore,
    AppError, AppResult,
};
use tracing::{debug, info, instrument, warn};

use crate::constants::ID_RANDOM_ATTEMPTS;
use crate::session::Interaction;

/// Customer directory
///
/// Loaded once from a [`CustomerStore`]; every change stays in memory until
/// [`CustomerDirectory::persist`] replaces the stored contents.
pub struct CustomerDirectory<S: CustomerStore> {
    store: S,
    customers: CustomerMap,
    load_warning: Option<AppError>,
    rng: StdRng,
}

impl<S: CustomerStore> CustomerDirectory<S> {
    /// Load the directory from `store`
    ///
    /// An unreadable or malformed store does not fail: the directory starts
    /// empty and the cause is kept as a warning for the caller.
    #[instrument(skip(store))]
    pub fn load(store: S) -> Self {
        let (customers, load_warning) = match store.load() {
            Ok(customers) => {
                info!("Loaded {} customers", customers.len());
                (customers, None)
            }
            Err(e) => {
                warn!("Customer store unusable, starting with an empty directory: {}", e);
                (CustomerMap::new(), Some(e))
            }
        };

        Self {
            store,
            customers,
            load_warning,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a specific random source for id generation
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Warning recorded while loading, if the store had to be reset
    pub fn load_warning(&self) -> Option<&AppError> {
        self.load_warning.as_ref()
    }

    /// Hand the load warning to the caller, clearing it
    pub fn take_load_warning(&mut self) -> Option<AppError> {
        self.load_warning.take()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn contains(&self, id: &CustomerId) -> bool {
        self.customers.contains_key(id)
    }

    /// Find a stored profile by id
    pub fn lookup(&self, id: &str) -> Option<CustomerProfile> {
        let id = CustomerId::parse(id).ok()?;
        self.get(&id)
    }

    fn get(&self, id: &CustomerId) -> Option<CustomerProfile> {
        self.customers
            .get(id)
            .map(|details| CustomerProfile::new(id.clone(), details.clone()))
    }

    /// Resolve a returning customer or register a new one
    ///
    /// - The id already assigned to `interaction` wins; its stored profile is
    ///   returned untouched.
    /// - A non-empty `candidate_id` found in the directory returns the stored
    ///   profile and ignores `name`/`contact`.
    /// - Otherwise `name` and `contact` must both be present, a fresh id is
    ///   minted and the profile is stored in memory.
    #[instrument(skip(self, interaction, name, contact))]
    pub fn create_or_reuse(
        &mut self,
        interaction: &mut Interaction,
        candidate_id: &str,
        name: &str,
        contact: &str,
    ) -> AppResult<CustomerProfile> {
        if let Some(assigned) = interaction.customer_id() {
            if let Some(profile) = self.get(assigned) {
                debug!("Customer {} already assigned to this interaction", assigned);
                return Ok(profile);
            }
        }

        let candidate = candidate_id.trim();
        if !candidate.is_empty() && !interaction.has_customer() {
            if let Some(profile) = self.lookup(candidate) {
                info!("Returning customer {}", profile.id);
                interaction.assign(profile.id.clone());
                return Ok(profile);
            }
            debug!("Customer id '{}' not on file, registering as new", candidate);
        }

        let details = CustomerDetails::validated(name, contact)?;

        let id = match interaction.customer_id() {
            Some(id) => id.clone(),
            None => self.generate_id()?,
        };

        self.customers.insert(id.clone(), details.clone());
        interaction.assign(id.clone());

        info!("New customer added with ID: {}", id);

        Ok(CustomerProfile::new(id, details))
    }

    /// Replace a stored customer's name and contact
    ///
    /// Returning customers are never changed by [`Self::create_or_reuse`];
    /// corrections go through here explicitly.
    #[instrument(skip(self, name, contact))]
    pub fn update_profile(
        &mut self,
        id: &CustomerId,
        name: &str,
        contact: &str,
    ) -> AppResult<CustomerProfile> {
        let details = CustomerDetails::validated(name, contact)?;

        let stored = self
            .customers
            .get_mut(id)
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;
        *stored = details.clone();

        info!("Updated customer {}", id);

        Ok(CustomerProfile::new(id.clone(), details))
    }

    /// Write the whole directory to the store, replacing previous contents
    #[instrument(skip(self))]
    pub fn persist(&self) -> AppResult<()> {
        self.store.save(&self.customers)?;
        info!("Persisted {} customers", self.customers.len());
        Ok(())
    }

    /// Draw an unused id uniformly from the id range
    ///
    /// Random draws are bounded; once they run out the range is scanned in
    /// order, so generation always terminates.
    fn generate_id(&mut self) -> AppResult<CustomerId> {
        for _ in 0..ID_RANDOM_ATTEMPTS {
            let n = self.rng.gen_range(CustomerId::MIN..=CustomerId::MAX);
            let id = CustomerId::from_number(n)?;
            if !self.customers.contains_key(&id) {
                return Ok(id);
            }
        }

        warn!(
            "No free customer id after {} random draws, scanning id range",
            ID_RANDOM_ATTEMPTS
        );

        (CustomerId::MIN..=CustomerId::MAX)
            .filter_map(|n| CustomerId::from_number(n).ok())
            .find(|id| !self.customers.contains_key(id))
            .ok_or(AppError::IdSpaceExhausted)
    }
}
