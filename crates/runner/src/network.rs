//! Network parameter resolution.
//!
//! The first run of a batch takes the network parameters from the command
//! line and records them in the state file. Later runs read them back; any
//! network flag still given must agree with what was recorded.

use crate::RunnerError;
use simprov_types::NetworkParameters;

/// Network flags as given on the command line. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkOverride {
    pub name: Option<String>,
    pub smsp: Option<String>,
    pub mcc: Option<u16>,
    pub mnc: Option<u16>,
}

impl NetworkOverride {
    /// Override carrying every field of `network`.
    pub fn from_parameters(network: &NetworkParameters) -> Self {
        Self {
            name: Some(network.name.clone()),
            smsp: Some(network.smsp.clone()),
            mcc: Some(network.mcc),
            mnc: Some(network.mnc),
        }
    }
}

fn check<T: PartialEq + ToString>(
    flag: &'static str,
    stored: &T,
    given: &Option<T>,
) -> Result<(), RunnerError> {
    match given {
        Some(given) if given != stored => Err(RunnerError::NetworkMismatch {
            flag,
            stored: stored.to_string(),
            given: given.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Decide the network parameters for this run.
///
/// - `stored` present: it wins, and every given flag must match it.
/// - `stored` absent: all four flags are required.
pub fn resolve_network(
    stored: Option<&NetworkParameters>,
    given: &NetworkOverride,
) -> Result<NetworkParameters, RunnerError> {
    if let Some(stored) = stored {
        check("--network-name", &stored.name, &given.name)?;
        check("--smsp", &stored.smsp, &given.smsp)?;
        check("--mcc", &stored.mcc, &given.mcc)?;
        check("--mnc", &stored.mnc, &given.mnc)?;
        return Ok(stored.clone());
    }

    match given {
        NetworkOverride {
            name: Some(name),
            smsp: Some(smsp),
            mcc: Some(mcc),
            mnc: Some(mnc),
        } => Ok(NetworkParameters::new(name.clone(), smsp.clone(), *mcc, *mnc)),
        _ => {
            let missing = [
                ("--network-name", given.name.is_none()),
                ("--smsp", given.smsp.is_none()),
                ("--mcc", given.mcc.is_none()),
                ("--mnc", given.mnc.is_none()),
            ]
            .into_iter()
            .filter_map(|(flag, absent)| absent.then_some(flag))
            .collect();
            Err(RunnerError::MissingNetwork { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simprov_test_helpers::test_network;

    #[test]
    fn test_fresh_state_requires_every_flag() {
        let given = NetworkOverride {
            name: Some("Net".to_string()),
            mcc: Some(1),
            ..Default::default()
        };
        let err = resolve_network(None, &given).unwrap_err();
        assert!(matches!(
            &err,
            RunnerError::MissingNetwork { missing } if missing == &["--smsp", "--mnc"]
        ));
        assert_eq!(
            err.to_string(),
            "no network parameters in state file; required: --smsp, --mnc"
        );
    }

    #[test]
    fn test_fresh_state_uses_flags() {
        let network = test_network();
        let resolved =
            resolve_network(None, &NetworkOverride::from_parameters(&network)).unwrap();
        assert_eq!(resolved, network);
    }

    #[test]
    fn test_stored_parameters_win() {
        let network = test_network();
        let resolved = resolve_network(Some(&network), &NetworkOverride::default()).unwrap();
        assert_eq!(resolved, network);

        let matching = NetworkOverride {
            mcc: Some(network.mcc),
            ..Default::default()
        };
        assert_eq!(resolve_network(Some(&network), &matching).unwrap(), network);
    }

    #[test]
    fn test_conflicting_flag_is_rejected() {
        let network = test_network();
        let given = NetworkOverride {
            mnc: Some(network.mnc + 1),
            ..Default::default()
        };
        let err = resolve_network(Some(&network), &given).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::NetworkMismatch { flag: "--mnc", .. }
        ));
    }
}
