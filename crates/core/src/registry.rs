//! Registry of supported card types.

use crate::{CardDriver, CardError, CardReader, CardSession, CardTypeSelection, RegistryError};
use tracing::{debug, info};

/// Fixed, priority-ordered set of card-type drivers.
///
/// Autodetection tries drivers in registration order and binds the first
/// one that recognises the card.
#[derive(Default)]
pub struct CardRegistry {
    drivers: Vec<Box<dyn CardDriver>>,
}

impl CardRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a driver at the lowest priority.
    pub fn with_driver(mut self, driver: impl CardDriver + 'static) -> Result<Self, RegistryError> {
        self.register(Box::new(driver))?;
        Ok(self)
    }

    /// Add a driver at the lowest priority.
    ///
    /// Fails if a driver with the same name is already registered.
    pub fn register(&mut self, driver: Box<dyn CardDriver>) -> Result<(), RegistryError> {
        if self.lookup(driver.name()).is_some() {
            return Err(RegistryError::DuplicateCardType {
                name: driver.name().to_string(),
            });
        }
        self.drivers.push(driver);
        Ok(())
    }

    /// Names of all registered card types, in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().map(|d| d.name())
    }

    /// Find a driver by name.
    pub fn lookup(&self, name: &str) -> Option<&dyn CardDriver> {
        self.drivers
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
    }

    /// Find a driver by name, failing with the list of known types.
    pub fn driver(&self, name: &str) -> Result<&dyn CardDriver, RegistryError> {
        self.lookup(name)
            .ok_or_else(|| RegistryError::UnknownCardType {
                name: name.to_string(),
                known: self.names().map(str::to_string).collect(),
            })
    }

    /// Check that a selection can be satisfied by this registry.
    pub fn validate(&self, selection: &CardTypeSelection) -> Result<(), RegistryError> {
        match selection {
            CardTypeSelection::Named(name) => self.driver(name).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Probe the inserted card with every driver in priority order.
    ///
    /// Returns `Ok(None)` if no driver recognises the card.
    pub fn autodetect(
        &self,
        reader: &mut dyn CardReader,
    ) -> Result<Option<Box<dyn CardSession>>, CardError> {
        for driver in &self.drivers {
            debug!(card_type = driver.name(), "Probing card");
            if let Some(session) = driver.autodetect(reader)? {
                info!(card_type = driver.name(), "Autodetected card type");
                return Ok(Some(session));
            }
        }
        Ok(None)
    }

    /// Number of registered drivers.
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl std::fmt::Debug for CardRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Apdu, ApduResponse, ReaderError};
    use simprov_types::CardPayload;
    use tracing_test::traced_test;

    struct FixedAtrReader(Vec<u8>);

    impl CardReader for FixedAtrReader {
        fn wait_for_card(&mut self, _new_card_only: bool) -> Result<(), ReaderError> {
            Ok(())
        }

        fn atr(&mut self) -> Result<Vec<u8>, ReaderError> {
            Ok(self.0.clone())
        }

        fn transmit(&mut self, _apdu: &Apdu) -> Result<ApduResponse, ReaderError> {
            Ok(ApduResponse::ok(Vec::new()))
        }
    }

    struct NullSession(&'static str);

    impl CardSession for NullSession {
        fn card_type(&self) -> &str {
            self.0
        }

        fn reset(&mut self, _reader: &mut dyn CardReader) -> Result<(), CardError> {
            Ok(())
        }

        fn erase(&mut self, _reader: &mut dyn CardReader) -> Result<(), CardError> {
            Ok(())
        }

        fn program(
            &mut self,
            _reader: &mut dyn CardReader,
            _payload: &CardPayload,
        ) -> Result<(), CardError> {
            Ok(())
        }
    }

    struct AtrDriver {
        name: &'static str,
        atr_prefix: u8,
    }

    impl CardDriver for AtrDriver {
        fn name(&self) -> &str {
            self.name
        }

        fn autodetect(
            &self,
            reader: &mut dyn CardReader,
        ) -> Result<Option<Box<dyn CardSession>>, CardError> {
            let atr = reader.atr()?;
            Ok((atr.first() == Some(&self.atr_prefix)).then(|| self.bind()))
        }

        fn bind(&self) -> Box<dyn CardSession> {
            Box::new(NullSession(self.name))
        }
    }

    fn registry() -> CardRegistry {
        CardRegistry::new()
            .with_driver(AtrDriver {
                name: "first",
                atr_prefix: 0x3B,
            })
            .and_then(|r| {
                r.with_driver(AtrDriver {
                    name: "second",
                    atr_prefix: 0x3B,
                })
            })
            .and_then(|r| {
                r.with_driver(AtrDriver {
                    name: "third",
                    atr_prefix: 0x3F,
                })
            })
            .unwrap()
    }

    #[traced_test]
    #[test]
    fn test_autodetect_uses_priority_order() {
        let registry = registry();

        let session = registry
            .autodetect(&mut FixedAtrReader(vec![0x3B, 0x9F]))
            .unwrap()
            .unwrap();
        assert_eq!(session.card_type(), "first");

        let session = registry
            .autodetect(&mut FixedAtrReader(vec![0x3F]))
            .unwrap()
            .unwrap();
        assert_eq!(session.card_type(), "third");
    }

    #[traced_test]
    #[test]
    fn test_autodetect_no_match() {
        let registry = registry();
        let session = registry
            .autodetect(&mut FixedAtrReader(vec![0x00]))
            .unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn test_validate_selection() {
        let registry = registry();
        assert!(registry.validate(&CardTypeSelection::Auto).is_ok());
        assert!(registry
            .validate(&CardTypeSelection::Named("second".into()))
            .is_ok());

        let err = registry
            .validate(&CardTypeSelection::Named("bogus".into()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown card type \"bogus\" (known types: first, second, third)"
        );
    }

    #[test]
    fn test_names_in_priority_order() {
        let reg = registry();
        let names: Vec<&str> = reg.names().collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = registry().with_driver(AtrDriver {
            name: "first",
            atr_prefix: 0,
        });
        let Err(err) = result else {
            panic!("duplicate card type accepted");
        };
        assert_eq!(
            err,
            RegistryError::DuplicateCardType {
                name: "first".to_string()
            }
        );
        assert_eq!(err.to_string(), "card type \"first\" registered twice");
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!("auto".parse(), Ok(CardTypeSelection::Auto));
        assert_eq!("auto_once".parse(), Ok(CardTypeSelection::AutoOnce));
        assert_eq!(
            "sysmosim-gr1".parse(),
            Ok(CardTypeSelection::Named("sysmosim-gr1".into()))
        );
    }
}
