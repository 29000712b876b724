//! Canonical one-line rendering of a sparse address.
//!
//! # Invariants
//! - Pure and deterministic: identical input yields byte-identical output.
//! - Absent fields are skipped; the result never contains empty segments or
//!   leading/trailing separators.
//! - All fields absent renders to no value, not an empty string.

use crate::model::AddressDraft;

const SEPARATOR: &str = ", ";

/// Renders an address draft into one display string.
///
/// Field order is fixed: region code, country, district, city, settlement,
/// street, building, room, with the free-text note last. Building and room
/// carry their semantic labels so bare numbers stay unambiguous.
pub fn format_address(draft: &AddressDraft) -> Option<String> {
    let draft = draft.normalized();
    let mut parts: Vec<String> = Vec::new();

    let mut push_plain = |value: &Option<String>| {
        if let Some(value) = value {
            parts.push(value.clone());
        }
    };

    push_plain(&draft.region_code);
    push_plain(&draft.country);
    push_plain(&draft.district);
    push_plain(&draft.city);
    push_plain(&draft.settlement);
    push_plain(&draft.street);

    if let Some(building) = &draft.building {
        parts.push(format!("д. {building}"));
    }
    if let Some(room) = &draft.room {
        parts.push(format!("кв. {room}"));
    }
    if let Some(note) = &draft.note {
        parts.push(note.clone());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::format_address;
    use crate::model::AddressDraft;

    fn draft(region_code: &str) -> AddressDraft {
        AddressDraft {
            region_code: Some(region_code.to_string()),
            ..AddressDraft::default()
        }
    }

    #[test]
    fn region_only_renders_without_separators() {
        let mut input = draft("50");
        input.city = Some("   ".to_string());
        input.street = Some(String::new());

        assert_eq!(format_address(&input).as_deref(), Some("50"));
    }

    #[test]
    fn building_and_room_are_labelled() {
        let mut input = draft("77");
        input.city = Some("Москва".to_string());
        input.street = Some("Тверская".to_string());
        input.building = Some("1".to_string());

        assert_eq!(
            format_address(&input).as_deref(),
            Some("77, Москва, Тверская, д. 1")
        );

        input.room = Some("12".to_string());
        assert_eq!(
            format_address(&input).as_deref(),
            Some("77, Москва, Тверская, д. 1, кв. 12")
        );
    }

    #[test]
    fn note_renders_last() {
        let mut input = draft("77");
        input.note = Some("вход со двора".to_string());
        input.city = Some("Москва".to_string());

        assert_eq!(
            format_address(&input).as_deref(),
            Some("77, Москва, вход со двора")
        );
    }

    #[test]
    fn all_fields_absent_renders_nothing() {
        assert_eq!(format_address(&AddressDraft::default()), None);
    }

    #[test]
    fn output_is_deterministic() {
        let mut input = draft("23");
        input.country = Some("Россия".to_string());
        input.settlement = Some("Ольгинка".to_string());

        let first = format_address(&input);
        let second = format_address(&input);
        assert_eq!(first, second);
    }
}
