//! Zone-name to restricted-access lookup.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneAccess {
    Restricted,
    Unrestricted,
    /// Not listed in the table, or a blank name.
    Unknown,
}

impl fmt::Display for ZoneAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ZoneAccess::Restricted => "Restricted",
            ZoneAccess::Unrestricted => "Not Restricted",
            ZoneAccess::Unknown => "Unknown zone",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    zones: BTreeMap<String, bool>,
}

impl ZoneTable {
    pub fn new(zones: BTreeMap<String, bool>) -> Self {
        Self { zones }
    }

    pub fn lookup(&self, name: &str) -> ZoneAccess {
        let name = name.trim();
        if name.is_empty() {
            return ZoneAccess::Unknown;
        }
        match self.zones.get(name) {
            Some(true) => ZoneAccess::Restricted,
            Some(false) => ZoneAccess::Unrestricted,
            None => ZoneAccess::Unknown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ZoneTable {
        ZoneTable::new(BTreeMap::from([
            ("Boiler_Room".to_string(), true),
            ("Loading_Dock".to_string(), false),
        ]))
    }

    #[test]
    fn exact_match_after_trim() {
        let zones = table();
        assert_eq!(zones.lookup("Boiler_Room"), ZoneAccess::Restricted);
        assert_eq!(zones.lookup("  Loading_Dock "), ZoneAccess::Unrestricted);
        assert_eq!(zones.lookup("boiler_room"), ZoneAccess::Unknown);
    }

    #[test]
    fn blank_name_is_unknown() {
        assert_eq!(table().lookup("   "), ZoneAccess::Unknown);
    }
}
