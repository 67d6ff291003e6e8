use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an optional enum flag.
pub fn parse_opt_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|raw| parse_enum(raw, field)).transpose()
}

#[cfg(test)]
mod tests {
    use vb_core::enums::{AuditAction, EntityType, Role};

    use super::{parse_enum, parse_opt_enum};

    #[test]
    fn parses_snake_case_enum() {
        let role: Role = parse_enum("admin", "role").expect("role should parse");
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn parses_hyphenated_and_uppercase_alias() {
        let entity: EntityType = parse_enum("Time-Slots", "entity").expect("entity should parse");
        assert_eq!(entity, EntityType::TimeSlots);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<AuditAction>("archive", "action").expect_err("should fail");
        assert!(err.to_string().contains("invalid action 'archive'"));
    }

    #[test]
    fn optional_absent_is_none() {
        let parsed: Option<AuditAction> = parse_opt_enum(None, "action").unwrap();
        assert!(parsed.is_none());
    }
}
