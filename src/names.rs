//! Name lookup for numeric signaling values.
//!
//! Display formatting renders numeric fields through this module so that
//! registered values show a human-readable name instead of a bare number.
//! The tables are static and read-only; concurrent lookups need no locking.

/// Category of a numeric value being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameCategory {
    /// CA_system_id values (ARIB and DVB registrations).
    CaSystemId,
    /// ISDB conditional-access transmission types.
    CaTransmissionType,
}

/// Registered CA_system_id ranges, `(first, last, name)`.
static CA_SYSTEM_ID_NAMES: &[(u16, u16, &str)] = &[
    (0x0005, 0x0005, "ARIB (B-CAS)"),
    (0x0100, 0x01FF, "Canal+ (MediaGuard)"),
    (0x0500, 0x05FF, "France Telecom (Viaccess)"),
    (0x0600, 0x06FF, "Irdeto"),
    (0x0900, 0x09FF, "NDS (VideoGuard)"),
    (0x0B00, 0x0BFF, "Conax"),
    (0x0D00, 0x0DFF, "Philips (CryptoWorks)"),
    (0x0E00, 0x0EFF, "Scientific Atlanta (PowerVu)"),
    (0x1800, 0x18FF, "Kudelski (Nagravision)"),
];

/// ISDB CA transmission-type names.
static TRANSMISSION_TYPE_NAMES: &[(u8, &str)] = &[(7, "broadcast route")];

/// Render a numeric value through its category's name table.
///
/// Known CA system ids render as `"Name (0xXXXX)"`, unknown ones as
/// `"0xXXXX"`. Transmission types render decimal-first: `"7 (broadcast
/// route)"` when known, the bare decimal value otherwise.
pub fn lookup(category: NameCategory, value: u32) -> String {
    match category {
        NameCategory::CaSystemId => {
            let id = value as u16;
            match CA_SYSTEM_ID_NAMES
                .iter()
                .find(|(first, last, _)| (*first..=*last).contains(&id))
            {
                Some((_, _, name)) => format!("{name} (0x{id:04X})"),
                None => format!("0x{id:04X}"),
            }
        }
        NameCategory::CaTransmissionType => {
            let ty = value as u8;
            match TRANSMISSION_TYPE_NAMES.iter().find(|(v, _)| *v == ty) {
                Some((_, name)) => format!("{ty} ({name})"),
                None => ty.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ca_system_id_names() {
        assert_eq!(
            lookup(NameCategory::CaSystemId, 0x0005),
            "ARIB (B-CAS) (0x0005)"
        );
        assert_eq!(lookup(NameCategory::CaSystemId, 0x0612), "Irdeto (0x0612)");
        assert_eq!(lookup(NameCategory::CaSystemId, 0x0001), "0x0001");
    }

    #[test]
    fn test_transmission_type_names() {
        assert_eq!(
            lookup(NameCategory::CaTransmissionType, 7),
            "7 (broadcast route)"
        );
        assert_eq!(lookup(NameCategory::CaTransmissionType, 3), "3");
    }
}
