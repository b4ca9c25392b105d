use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Bucket for lines whose state code is missing or unknown
pub const INVALID_STATE: &str = "XX";
/// Region of a state code that is not in the map
pub const UNKNOWN_REGION: &str = "Outros";

/// Brazilian states (UF) and their macro-region; `EX` marks export customers
pub static STATE_REGIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for uf in ["AC", "AM", "AP", "PA", "RO", "RR", "TO"] {
        map.insert(uf, "Norte");
    }
    for uf in ["AL", "BA", "CE", "MA", "PB", "PE", "PI", "RN", "SE"] {
        map.insert(uf, "Nordeste");
    }
    for uf in ["DF", "GO", "MS", "MT"] {
        map.insert(uf, "Centro-Oeste");
    }
    for uf in ["ES", "MG", "RJ", "SP"] {
        map.insert(uf, "Sudeste");
    }
    for uf in ["PR", "RS", "SC"] {
        map.insert(uf, "Sul");
    }
    map.insert("EX", "Exterior");
    map
});

pub fn region_of(code: &str) -> &'static str {
    STATE_REGIONS
        .get(code.trim().to_uppercase().as_str())
        .copied()
        .unwrap_or(UNKNOWN_REGION)
}

/// Upper-cased state code, or `XX` when it is not a known state
pub fn normalize_state(code: &str) -> String {
    let code = code.trim().to_uppercase();
    if STATE_REGIONS.contains_key(code.as_str()) {
        code
    } else {
        INVALID_STATE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_map_covers_all_units() {
        // 26 states, the federal district and the export marker
        assert_eq!(STATE_REGIONS.len(), 28);
        assert_eq!(region_of("sp"), "Sudeste");
        assert_eq!(region_of(" ex "), "Exterior");
        assert_eq!(region_of("ZZ"), UNKNOWN_REGION);
    }

    #[test]
    fn test_normalize_state() {
        assert_eq!(normalize_state(" rs"), "RS");
        assert_eq!(normalize_state(""), INVALID_STATE);
        assert_eq!(normalize_state("São Paulo"), INVALID_STATE);
        assert_eq!(normalize_state("df"), "DF");
        assert_eq!(normalize_state("xx"), INVALID_STATE);
    }
}
