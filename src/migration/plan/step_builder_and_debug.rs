impl std::fmt::Debug for StateMigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMigrationStep")
            .field("from_version", &self.from_version)
            .field("to_version", &self.to_version)
            .field("description", &self.description)
            .field("has_migrator", &self.migrator.is_some())
            .finish()
    }
}

impl StateMigrationStep {
    /// Creates a new migration step between two versions.
    pub fn new(from_version: u32, to_version: u32) -> Self {
        Self {
            from_version,
            to_version,
            description: String::new(),
            migrator: None,
        }
    }

    /// Creates the step from `from_version` to the version right after it.
    pub fn upgrade_from(from_version: u32) -> Self {
        Self::new(from_version, from_version.saturating_add(1))
    }

    /// Describes what the step changes, for reports and logs.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds the transform applied by this step.
    ///
    /// The transform receives the previous version's value and must return a
    /// new value; it never sees a mutable reference.
    pub fn with_migrator<F>(mut self, migrator: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.migrator = Some(Arc::new(migrator));
        self
    }

    /// Applies the step. Steps without a transform only re-tag the value.
    pub fn apply(&self, state: &Value) -> Value {
        let mut next = match &self.migrator {
            Some(migrator) => migrator(state),
            None => state.clone(),
        };

        if let Some(object) = next.as_object_mut() {
            object.insert(
                STATE_VERSION_KEY.to_string(),
                Value::from(self.to_version),
            );
        }

        next
    }
}
