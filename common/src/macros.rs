/// Declares a uuid-backed identifier for entities that are created at runtime
/// and have no natural key (constellation links, labels).
#[macro_export]
macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Ord,
            PartialOrd,
            Debug,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            pub fn unique() -> $name {
                $name(uuid::Uuid::new_v4())
            }
            pub fn nil() -> $name {
                $name(uuid::Uuid::nil())
            }
            pub fn is_nil(&self) -> bool {
                self.0 == uuid::Uuid::nil()
            }
        }

        impl std::str::FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(id: &str) -> Result<$name, Self::Err> {
                let uuid = uuid::Uuid::parse_str(id)?;
                Ok($name(uuid))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> $name {
                $name::nil()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    id_type!(TestId);

    #[test]
    fn unique_ids_differ_and_are_not_nil() {
        let a = TestId::unique();
        let b = TestId::unique();
        assert_ne!(a, b);
        assert!(!a.is_nil());
        assert!(TestId::default().is_nil());
    }

    #[test]
    fn id_round_trips_through_display() -> anyhow::Result<()> {
        let id = TestId::unique();
        let parsed: TestId = id.to_string().parse()?;
        assert_eq!(parsed, id);
        Ok(())
    }
}
