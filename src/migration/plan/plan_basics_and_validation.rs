impl StateMigrationPlan {
    /// Creates a new empty migration plan for a target version.
    ///
    /// `default_state` must build a value already shaped for
    /// `current_version`; it is returned whenever the input cannot be trusted.
    pub fn new(current_version: u32, default_state: DefaultStateFn) -> Self {
        Self {
            current_version,
            steps: Vec::new(),
            default_state,
        }
    }

    /// Returns the target schema version of this plan.
    pub fn current_version(&self) -> u32 {
        self.current_version
    }

    /// Returns the list of registered migration steps.
    pub fn steps(&self) -> &[StateMigrationStep] {
        &self.steps
    }

    /// Builds a fresh default state for the target version.
    pub fn default_state(&self) -> Value {
        (self.default_state)()
    }

    /// Adds a migration step to the plan, validating it immediately.
    pub fn add_step(&mut self, step: StateMigrationStep) -> Result<()> {
        self.steps.push(step);
        if let Err(err) = self.validate() {
            self.steps.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Fluent builder method to add a step.
    pub fn with_step(mut self, step: StateMigrationStep) -> Result<Self> {
        self.add_step(step)?;
        Ok(self)
    }

    /// Helper to add a transform from `from_version` to the next version.
    pub fn add_state_step<F>(&mut self, from_version: u32, migrator: F) -> Result<()>
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.add_step(StateMigrationStep::upgrade_from(from_version).with_migrator(migrator))
    }

    /// Looks up the step that upgrades `version`.
    pub fn step_for(&self, version: u32) -> Option<&StateMigrationStep> {
        self.steps.iter().find(|step| step.from_version == version)
    }

    /// Validates the integrity of the migration plan.
    ///
    /// Checks for:
    /// - target version validity (>= 1),
    /// - single-version steps (`to == from + 1`),
    /// - step bounds (`to <= current`),
    /// - duplicate steps.
    pub fn validate(&self) -> Result<()> {
        if self.current_version == 0 {
            return Err(StateError::InvalidPlan(
                "Target state version must be >= 1".to_string(),
            ));
        }

        let mut seen_from = HashSet::<u32>::new();
        for step in &self.steps {
            if step.to_version != step.from_version.saturating_add(1) {
                return Err(StateError::InvalidPlan(format!(
                    "Migration step {} -> {} must advance exactly one version",
                    step.from_version, step.to_version
                )));
            }
            if step.to_version > self.current_version {
                return Err(StateError::InvalidPlan(format!(
                    "Migration step {} -> {} exceeds target state version {}",
                    step.from_version, step.to_version, self.current_version
                )));
            }
            if !seen_from.insert(step.from_version) {
                return Err(StateError::InvalidPlan(format!(
                    "Duplicate migration step starting at version {}",
                    step.from_version
                )));
            }
        }

        Ok(())
    }

    /// Validates the plan and checks that every version below the target has
    /// a step.
    pub fn validate_complete(&self) -> Result<()> {
        self.validate()?;

        let missing = (0..self.current_version)
            .filter(|version| self.step_for(*version).is_none())
            .map(|version| version.to_string())
            .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StateError::InvalidPlan(format!(
                "Missing migration steps starting at versions {}",
                missing.join(", ")
            )))
        }
    }
}
