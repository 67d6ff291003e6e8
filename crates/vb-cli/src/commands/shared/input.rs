use std::io::Read;
use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use vb_core::requests::BundleLineInput;

/// Read a JSON document from `path`, or from stdin when the path is absent or `-`.
pub fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> anyhow::Result<T> {
    let text = match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read JSON from stdin")?;
            buf
        }
    };
    parse_json(&text)
}

pub fn parse_json<T: DeserializeOwned>(text: &str) -> anyhow::Result<T> {
    serde_json::from_str(text).context("invalid JSON input")
}

/// Parse a `service_id=charge` bundle line.
pub fn parse_line(raw: &str) -> anyhow::Result<BundleLineInput> {
    let (service, charge) = raw
        .split_once('=')
        .with_context(|| format!("invalid bundle line '{raw}': expected service_id=charge"))?;
    let service_id: i64 = service
        .trim()
        .parse()
        .with_context(|| format!("invalid service id in '{raw}'"))?;
    let charge: Decimal = charge
        .trim()
        .parse()
        .with_context(|| format!("invalid charge in '{raw}'"))?;
    Ok(BundleLineInput { service_id, charge })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vb_db::updates::reservation::ReservationPatch;

    use super::*;

    #[test]
    fn parses_bundle_line() {
        let line = parse_line("2 = 2500.50").unwrap();
        assert_eq!(line.service_id, 2);
        assert_eq!(line.charge, Decimal::new(250_050, 2));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("2500").is_err());
        assert!(parse_line("two=2500").is_err());
        assert!(parse_line("2=lots").is_err());
    }

    #[test]
    fn reads_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("patch.json");
        std::fs::write(&path, r#"{"theme": "Spring ball"}"#).unwrap();

        let patch: ReservationPatch = read_json(Some(&path)).unwrap();
        assert_eq!(patch.theme.as_deref(), Some("Spring ball"));
    }

    #[test]
    fn unknown_patch_keys_are_refused() {
        let parsed = parse_json::<ReservationPatch>(r#"{"owner_id": 9}"#);
        assert!(parsed.is_err());
    }
}
