impl StateMigrationPlan {
    /// Whether `raw` is an object already tagged with the target version.
    pub fn is_current(&self, raw: &Value) -> bool {
        raw.is_object()
            && field(raw, STATE_VERSION_KEY).and_then(as_integer)
                == Some(i64::from(self.current_version))
    }

    /// Resolves ordered steps from `from_version` to `current_version`, or
    /// the first version that has no step.
    fn resolve_chain(&self, from_version: u32) -> std::result::Result<Vec<&StateMigrationStep>, u32> {
        let mut by_from = HashMap::<u32, &StateMigrationStep>::new();
        for step in &self.steps {
            by_from.insert(step.from_version, step);
        }

        let mut cursor = from_version;
        let mut chain = Vec::new();
        while cursor < self.current_version {
            let step = by_from.get(&cursor).copied().ok_or(cursor)?;
            chain.push(step);
            cursor = step.to_version;
        }

        Ok(chain)
    }

    /// Migrates `raw` to the target version.
    ///
    /// Input already at the target version comes back borrowed; every other
    /// path returns a new value. `raw` is never modified.
    pub fn migrate<'a>(&self, raw: &'a Value) -> Cow<'a, Value> {
        self.migrate_with_report(raw).0
    }

    /// Like [`migrate`](Self::migrate), also describing what happened.
    pub fn migrate_with_report<'a>(&self, raw: &'a Value) -> (Cow<'a, Value>, MigrationReport) {
        if self.is_current(raw) {
            let report = MigrationReport {
                detected: DetectedVersion::Tagged(i64::from(self.current_version)),
                target_version: self.current_version,
                outcome: MigrationOutcome::Unchanged,
            };
            return (Cow::Borrowed(raw), report);
        }

        let detected = detect_version(raw);
        let span = info_span!(
            "state.migrate",
            detected = %detected,
            target_version = self.current_version
        );
        let _enter = span.enter();

        let Some(from_version) = detected.registry_index(self.current_version) else {
            event!(Level::WARN, "discarding state with unsupported version");
            return self.fallback(detected, FallbackReason::UnsupportedVersion(detected));
        };

        let chain = match self.resolve_chain(from_version) {
            Ok(chain) => chain,
            Err(missing) => {
                event!(Level::WARN, missing, "no migration step for version, using defaults");
                return self.fallback(detected, FallbackReason::MissingStep(missing));
            }
        };

        let mut migrated: Option<Value> = None;
        for step in &chain {
            let next = step.apply(migrated.as_ref().unwrap_or(raw));
            event!(
                Level::DEBUG,
                from = step.from_version,
                to = step.to_version,
                "applied state migration step"
            );
            migrated = Some(next);
        }

        let steps_applied = chain.len();
        let migrated = migrated.unwrap_or_else(|| self.default_state());
        event!(Level::DEBUG, steps_applied, "state migrated");

        let report = MigrationReport {
            detected,
            target_version: self.current_version,
            outcome: MigrationOutcome::Migrated {
                from_version,
                steps_applied,
            },
        };
        (Cow::Owned(migrated), report)
    }

    fn fallback<'a>(
        &self,
        detected: DetectedVersion,
        reason: FallbackReason,
    ) -> (Cow<'a, Value>, MigrationReport) {
        let report = MigrationReport {
            detected,
            target_version: self.current_version,
            outcome: MigrationOutcome::Defaulted(reason),
        };
        (Cow::Owned(self.default_state()), report)
    }
}
