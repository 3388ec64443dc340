//! Use-Case: Schreibreihenfolge für Persistenz-Writer.
//!
//! Die Reihenfolge ist Teil des Dateiformats und muss beim Neuladen exakt
//! reproduzierbar sein.

use indexmap::IndexSet;

use crate::core::{
    AdditionalTag, Category, DemandTag, Element, ElementHandle, Network, SaveCategory,
};

/// Additional ohne Additional-Parent.
fn is_top_level_additional(net: &Network, handle: ElementHandle) -> bool {
    !net
        .hierarchy()
        .parents(handle)
        .iter()
        .any(|p| net.additional(*p).is_ok())
}

/// Hängt `handle` und rekursiv alle Kinder gleicher Kategorie-Familie an.
fn push_with_children(
    net: &Network,
    handle: ElementHandle,
    out: &mut IndexSet<ElementHandle>,
    same_family: &impl Fn(&Element) -> bool,
) {
    if !out.insert(handle) {
        return;
    }
    for child in net.hierarchy().children(handle) {
        if net.element(*child).is_ok_and(same_family) {
            push_with_children(net, *child, out, same_family);
        }
    }
}

/// Additionals in Schreibreihenfolge: Routen-Sonden, Haltestellen,
/// Detektoren, übrige Additionals, zuletzt Polygone und POIs.
///
/// Kinder (z.B. Parkplätze eines Parkbereichs) folgen direkt ihrem Parent.
pub fn additionals_in_save_order(net: &Network) -> Vec<ElementHandle> {
    let is_additional = |e: &Element| matches!(e, Element::Additional(_));
    let top_level = |filter: &dyn Fn(AdditionalTag) -> bool| -> Vec<ElementHandle> {
        AdditionalTag::ALL
            .into_iter()
            .filter(|t| filter(*t))
            .flat_map(|t| net.retrieve(Category::Additional(t)))
            .filter(|h| is_top_level_additional(net, *h))
            .collect()
    };

    let groups = [
        top_level(&|t| t == AdditionalTag::RouteProbe),
        top_level(&|t| t.is_stopping_place()),
        top_level(&|t| t.is_detector()),
        top_level(&|t| !t.is_shape() && t != AdditionalTag::RouteProbe
            && !t.is_stopping_place()
            && !t.is_detector()),
        top_level(&|t| t.is_shape()),
    ];

    let mut out = IndexSet::new();
    for group in groups {
        for handle in group {
            push_with_children(net, handle, &mut out, &is_additional);
        }
    }
    out.into_iter().collect()
}

/// Demand-Elemente in Schreibreihenfolge: Fahrzeugtypen, Personentypen,
/// Routen, dann Fahrzeuge und Personen nach (Abfahrt, ID).
///
/// Pläne und Stops folgen ihrem Fahrzeug bzw. ihrer Person.
pub fn demand_in_save_order(net: &Network) -> Vec<ElementHandle> {
    let is_demand = |e: &Element| matches!(e, Element::Demand(_));
    let mut out = IndexSet::new();
    for tag in [DemandTag::VType, DemandTag::PType, DemandTag::Route] {
        out.extend(net.retrieve(Category::Demand(tag)));
    }
    for (_, handle) in net.store().departures() {
        push_with_children(net, handle, &mut out, &is_demand);
    }
    out.into_iter().collect()
}

/// Data-Sets mit ihren Intervallen (nach Beginn) und deren Datensätzen.
pub fn data_in_save_order(net: &Network) -> Vec<ElementHandle> {
    let mut out = Vec::new();
    for set in net.retrieve(Category::DataSet) {
        out.push(set);
        let mut intervals: Vec<(f64, ElementHandle)> = net
            .hierarchy()
            .children(set)
            .iter()
            .filter_map(|h| {
                net.element(*h)
                    .ok()
                    .and_then(Element::as_data_interval)
                    .map(|i| (i.begin, *h))
            })
            .collect();
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        for (_, interval) in intervals {
            out.push(interval);
            out.extend(net.hierarchy().children(interval).iter().copied());
        }
    }
    out
}

/// Speicherkategorien mit ungespeicherten Änderungen.
pub fn unsaved_categories(net: &Network) -> Vec<SaveCategory> {
    SaveCategory::ALL
        .into_iter()
        .filter(|c| !net.is_saved(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{create_additional, create_demand_element};
    use crate::app::EditorState;
    use crate::core::{Additional, DemandElement};
    use glam::Vec2;

    fn free_additional(state: &mut EditorState, id: &str, tag: AdditionalTag) -> ElementHandle {
        let additional = Additional {
            position: Some(Vec2::ZERO),
            ..Additional::new(id, tag)
        };
        create_additional(state, additional, &[]).expect("Additional")
    }

    #[test]
    fn additionals_follow_block_order_with_children_after_parent() {
        let mut state = EditorState::new();
        let poi = free_additional(&mut state, "p", AdditionalTag::Poi);
        let rerouter = free_additional(&mut state, "r", AdditionalTag::Rerouter);
        let e3 = free_additional(&mut state, "d", AdditionalTag::E3Detector);
        let entry = create_additional(
            &mut state,
            Additional::new("d_in", AdditionalTag::DetEntry),
            &[e3],
        )
        .expect("Entry");
        let route_counter = free_additional(&mut state, "rp", AdditionalTag::RouteProbe);
        let area = free_additional(&mut state, "pa", AdditionalTag::ParkingArea);

        let order = additionals_in_save_order(&state.network);

        assert_eq!(order, vec![route_counter, area, e3, entry, rerouter, poi]);
    }

    #[test]
    fn vehicles_are_written_by_departure_then_id() {
        let mut state = EditorState::new();
        let mut late = DemandElement::new("a", DemandTag::Person);
        late.depart = 20.0;
        let late = create_demand_element(&mut state, late, &[]).expect("Person");
        let mut early = DemandElement::new("z", DemandTag::Person);
        early.depart = 5.0;
        let early = create_demand_element(&mut state, early, &[]).expect("Person");
        let vtype = state
            .network
            .lookup(Category::Demand(DemandTag::VType), "DEFAULT_VEHTYPE")
            .expect("Typ");

        let order = demand_in_save_order(&state.network);

        assert_eq!(order, vec![vtype, early, late]);
    }

    #[test]
    fn nested_additionals_appear_once_after_their_parent() {
        let mut state = EditorState::new();
        let area = free_additional(&mut state, "pa", AdditionalTag::ParkingArea);
        let spaces: Vec<ElementHandle> = (0..50)
            .map(|i| {
                create_additional(
                    &mut state,
                    Additional::new(format!("space_{}", i), AdditionalTag::ParkingSpace),
                    &[area],
                )
                .expect("Parkplatz")
            })
            .collect();

        let order = additionals_in_save_order(&state.network);

        assert_eq!(order.len(), 51);
        assert_eq!(order[0], area);
        assert_eq!(&order[1..], spaces.as_slice());
    }

    #[test]
    fn unsaved_categories_follow_mutations() {
        let mut state = EditorState::new();
        assert!(unsaved_categories(&state.network).is_empty());

        free_additional(&mut state, "p", AdditionalTag::Poi);
        assert_eq!(
            unsaved_categories(&state.network),
            vec![SaveCategory::Additionals]
        );
    }
}
