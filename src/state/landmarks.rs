// Fixed landmark agents
// Four position-only agents around a point in the Netherlands, one per
// compass direction, useful for exercising FOV results without live devices.

use super::registry::AgentRegistry;
use crate::error::AppError;
use crate::geo::Position;
use tracing::info;

/// Landmark identifiers and their (latitude, longitude)
pub const LANDMARKS: [(&str, f64, f64); 4] = [
    ("Noorden", 51.859528, 4.645805),
    ("Oosten", 50.859528, 5.645805),
    ("Zuiden", 49.859528, 4.645805),
    ("Westen", 50.859528, 3.645805),
];

/// Insert every landmark into the registry
/// Returns the number of landmarks inserted
pub fn seed(registry: &AgentRegistry) -> Result<usize, AppError> {
    for (id, latitude, longitude) in LANDMARKS {
        registry.insert_landmark(id.to_string(), Position::new(latitude, longitude)?)?;
    }
    info!(count = LANDMARKS.len(), "Seeded landmark agents");
    Ok(LANDMARKS.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_inserts_all_landmarks() {
        let registry = AgentRegistry::new();
        assert_eq!(seed(&registry).unwrap(), 4);

        let ids: Vec<String> = registry.snapshot().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["Noorden", "Oosten", "Westen", "Zuiden"]);
        assert!(registry.snapshot().iter().all(|a| a.connection.is_none()));
    }

    #[test]
    fn test_seed_twice_fails() {
        let registry = AgentRegistry::new();
        seed(&registry).unwrap();
        assert!(matches!(seed(&registry), Err(AppError::DuplicateIdentifier(_))));
    }
}
