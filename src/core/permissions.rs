//! Fahrzeugklassen und Spur-Freigaben (`allow`-Listen).
//!
//! Eine leere `allow`-Liste gibt die Spur für alle Klassen frei; die Liste
//! `"ignoring"` sperrt sie für alle (Grünstreifen).

/// Alle bekannten Fahrzeugklassen in kanonischer Reihenfolge.
pub const VEHICLE_CLASSES: &[&str] = &[
    "private",
    "emergency",
    "authority",
    "army",
    "vip",
    "pedestrian",
    "passenger",
    "hov",
    "taxi",
    "bus",
    "coach",
    "delivery",
    "truck",
    "trailer",
    "motorcycle",
    "moped",
    "bicycle",
    "evehicle",
    "tram",
    "rail_urban",
    "rail",
    "rail_electric",
    "rail_fast",
    "ship",
    "custom1",
    "custom2",
];

/// Schienengebundene Klassen.
pub const RAIL_CLASSES: &[&str] = &["tram", "rail_urban", "rail", "rail_electric", "rail_fast"];

/// Name der Sperr-Klasse ohne Freigaben.
pub const IGNORING: &str = "ignoring";

/// Klassen, für die Sonderspuren angelegt werden können.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    /// Gehweg
    Pedestrian,
    /// Radweg
    Bicycle,
    /// Busspur
    Bus,
    /// Grünstreifen (keine Freigabe)
    Ignoring,
}

impl VehicleClass {
    pub fn name(self) -> &'static str {
        match self {
            VehicleClass::Pedestrian => "pedestrian",
            VehicleClass::Bicycle => "bicycle",
            VehicleClass::Bus => "bus",
            VehicleClass::Ignoring => IGNORING,
        }
    }

    /// Geh- und Radwege bekommen die schmale Standardbreite.
    pub fn uses_sidewalk_width(self) -> bool {
        matches!(self, VehicleClass::Pedestrian | VehicleClass::Bicycle)
    }
}

/// Zerlegt eine `allow`-Liste in die freigegebenen Klassen.
///
/// Leer bedeutet alle Klassen, `"ignoring"` keine.
pub fn allowed_classes(allow: &str) -> Vec<&str> {
    let names: Vec<&str> = allow.split_whitespace().collect();
    if names.is_empty() {
        return VEHICLE_CLASSES.to_vec();
    }
    names.into_iter().filter(|n| *n != IGNORING).collect()
}

/// Baut eine `allow`-Liste aus freigegebenen Klassen.
pub fn allow_string(classes: &[&str]) -> String {
    if classes.is_empty() {
        return IGNORING.to_string();
    }
    if VEHICLE_CLASSES.iter().all(|c| classes.contains(c)) {
        return String::new();
    }
    classes.join(" ")
}

/// `allow`-Liste ohne die angegebene Klasse.
pub fn without_class(allow: &str, class: &str) -> String {
    let remaining: Vec<&str> = allowed_classes(allow)
        .into_iter()
        .filter(|c| *c != class)
        .collect();
    allow_string(&remaining)
}

/// `true`, wenn die Spur exklusiv für diese Klasse freigegeben ist.
pub fn is_restricted(allow: &str, class: VehicleClass) -> bool {
    let mut names = allow.split_whitespace();
    names.next() == Some(class.name()) && names.next().is_none()
}

/// `true`, wenn nur Geh- und Radverkehr freigegeben ist.
pub fn is_pedestrian_or_bicycle_only(allow: &str) -> bool {
    let classes = allowed_classes(allow);
    classes.iter().all(|c| *c == "pedestrian" || *c == "bicycle")
}

/// `true` für Schienen-Spuren ohne Pkw-Freigabe.
pub fn is_railway(allow: &str) -> bool {
    let classes = allowed_classes(allow);
    classes.iter().any(|c| RAIL_CLASSES.contains(c)) && !classes.contains(&"passenger")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allow_means_all_classes() {
        assert_eq!(allowed_classes("").len(), VEHICLE_CLASSES.len());
        assert!(allowed_classes(IGNORING).is_empty());
        assert_eq!(allowed_classes("bus taxi"), vec!["bus", "taxi"]);
    }

    #[test]
    fn removing_a_class_from_all_lists_the_rest() {
        let without = without_class("", "pedestrian");
        assert!(!without.split_whitespace().any(|c| c == "pedestrian"));
        assert_eq!(
            without.split_whitespace().count(),
            VEHICLE_CLASSES.len() - 1
        );
        assert_eq!(without_class("pedestrian", "pedestrian"), IGNORING);
        assert_eq!(without_class("bus pedestrian", "pedestrian"), "bus");
    }

    #[test]
    fn restriction_means_exclusive_class() {
        assert!(is_restricted("pedestrian", VehicleClass::Pedestrian));
        assert!(!is_restricted("pedestrian bicycle", VehicleClass::Pedestrian));
        assert!(!is_restricted("", VehicleClass::Pedestrian));
        assert!(is_restricted(IGNORING, VehicleClass::Ignoring));
    }

    #[test]
    fn railway_detection() {
        assert!(is_railway("rail"));
        assert!(is_railway("tram rail_urban"));
        assert!(!is_railway(""));
        assert!(!is_railway("rail passenger"));
    }
}
