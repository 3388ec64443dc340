//! Use-Case: Sonderspuren (Gehweg, Radweg, Busspur, Grünstreifen).

use super::lanes::{delete_lane, insert_lane};
use crate::app::EditorState;
use crate::core::permissions::{self, VehicleClass};
use crate::core::{AttrKey, AttrValue, ElementHandle, NetError, NetResult};

/// Gibt die Spur exklusiv für `class` frei und setzt die passende Breite.
///
/// Ein Gehweg entzieht allen übrigen Spuren der Kante die Fußgänger-Freigabe.
/// Hat die Kante bereits einen Gehweg, bleibt alles unverändert und es wird
/// `false` zurückgegeben.
pub fn restrict_lane(
    state: &mut EditorState,
    class: VehicleClass,
    lane: ElementHandle,
) -> NetResult<bool> {
    let lane_id = state.network.lane(lane)?.id.clone();
    let edge = state.network.lane_edge(lane)?;
    let siblings = state.network.lanes_of(edge);

    if class == VehicleClass::Pedestrian {
        let has_sidewalk = siblings.iter().any(|l| {
            state
                .network
                .lane(*l)
                .is_ok_and(|l| permissions::is_restricted(&l.allow, VehicleClass::Pedestrian))
        });
        if has_sidewalk {
            log::debug!("Kante von Spur {} hat bereits einen Gehweg", lane_id);
            return Ok(false);
        }
    }

    let width = if class.uses_sidewalk_width() {
        state.options.default_sidewalk_width
    } else {
        state.options.default_lane_width
    };

    state.with_group("Spur beschränken", |s| {
        if class == VehicleClass::Pedestrian {
            for sibling in siblings.iter().copied().filter(|l| *l != lane) {
                let allow = permissions::without_class(&s.network.lane(sibling)?.allow, class.name());
                s.set_attr(sibling, AttrKey::Allow, AttrValue::Str(allow))?;
            }
        }
        s.set_attr(lane, AttrKey::Allow, AttrValue::Str(class.name().to_string()))?;
        s.set_attr(lane, AttrKey::Width, AttrValue::Float(width as f64))?;
        s.network.require_recompute();
        Ok(())
    })?;
    log::info!("Spur {} auf {} beschränkt", lane_id, class.name());
    Ok(true)
}

/// Fügt eine neue, auf `class` beschränkte Spur ein.
///
/// Ohne `index` wird die Position aus der Klasse abgeleitet: Gehwege ganz
/// rechts, Radwege links vom Gehweg, Busspuren und Grünstreifen links aller
/// reinen Geh- und Radspuren. Gibt `false` zurück, wenn die Kante schon eine
/// solche Spur hat oder der Index zu groß ist.
pub fn add_restricted_lane(
    state: &mut EditorState,
    class: VehicleClass,
    edge: ElementHandle,
    index: Option<usize>,
) -> NetResult<bool> {
    let edge_id = state.network.edge(edge)?.id.clone();
    let lanes = state.network.lanes_of(edge);
    let Some(&outermost) = lanes.last() else {
        return Err(NetError::integrity(format!("Kante {} ohne Spuren", edge_id)));
    };
    let allows = lanes
        .iter()
        .map(|l| Ok(state.network.lane(*l)?.allow.clone()))
        .collect::<NetResult<Vec<String>>>()?;

    if allows.iter().any(|a| permissions::is_restricted(a, class)) {
        log::debug!("Kante {} hat bereits eine {}-Spur", edge_id, class.name());
        return Ok(false);
    }
    let index = match index {
        Some(i) if i > lanes.len() => {
            log::warn!("Spur-Index {} zu groß für Kante {}", i, edge_id);
            return Ok(false);
        }
        Some(i) => i,
        None => match class {
            VehicleClass::Pedestrian => 0,
            VehicleClass::Bicycle => {
                usize::from(allows.first().is_some_and(|a| {
                    permissions::is_restricted(a, VehicleClass::Pedestrian)
                }))
            }
            VehicleClass::Bus | VehicleClass::Ignoring => allows
                .iter()
                .take_while(|a| permissions::is_pedestrian_or_bicycle_only(a))
                .count(),
        },
    };
    let source = lanes.get(index).copied().unwrap_or(outermost);

    state.with_group("Sonderspur hinzufügen", |s| {
        let template = s.network.lane(source)?.clone();
        let lane = insert_lane(s, edge, index, &template)?;
        restrict_lane(s, class, lane)
    })
}

/// Löscht die erste auf `class` beschränkte Spur der Kante.
///
/// Gibt `false` zurück, wenn es keine solche Spur gibt.
pub fn remove_restricted_lane(
    state: &mut EditorState,
    class: VehicleClass,
    edge: ElementHandle,
) -> NetResult<bool> {
    state.network.edge(edge)?;
    let restricted = state
        .network
        .lanes_of(edge)
        .into_iter()
        .find(|l| {
            state
                .network
                .lane(*l)
                .is_ok_and(|l| permissions::is_restricted(&l.allow, class))
        });
    match restricted {
        Some(lane) => {
            delete_lane(state, lane)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{
        create_edge, create_junction, EdgeCreateOptions, EdgeTemplate,
    };
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn edge_with_lanes(state: &mut EditorState, count: usize) -> ElementHandle {
        let a = create_junction(state, Vec2::ZERO).expect("A");
        let b = create_junction(state, Vec2::new(40.0, 0.0)).expect("B");
        let mut template = EdgeTemplate::from_options(&state.options);
        template.lanes = vec![template.lanes[0].clone(); count];
        create_edge(state, a, b, Some(&template), None, EdgeCreateOptions::default())
            .expect("ok")
            .expect("Kante")
    }

    fn allow_of(state: &EditorState, lane: ElementHandle) -> String {
        state.network.lane(lane).expect("Spur").allow.clone()
    }

    #[test]
    fn sidewalk_takes_pedestrians_from_other_lanes() {
        let mut state = EditorState::new();
        let edge = edge_with_lanes(&mut state, 2);
        let lanes = state.network.lanes_of(edge);

        assert_eq!(restrict_lane(&mut state, VehicleClass::Pedestrian, lanes[0]), Ok(true));

        assert_eq!(allow_of(&state, lanes[0]), "pedestrian");
        assert!(!allow_of(&state, lanes[1])
            .split_whitespace()
            .any(|c| c == "pedestrian"));
        assert_relative_eq!(
            state.network.lane(lanes[0]).expect("Spur").width,
            state.options.default_sidewalk_width
        );

        assert_eq!(restrict_lane(&mut state, VehicleClass::Pedestrian, lanes[1]), Ok(false));
    }

    #[test]
    fn bike_lane_is_placed_left_of_sidewalk() {
        let mut state = EditorState::new();
        let edge = edge_with_lanes(&mut state, 1);

        assert_eq!(
            add_restricted_lane(&mut state, VehicleClass::Pedestrian, edge, None),
            Ok(true)
        );
        assert_eq!(
            add_restricted_lane(&mut state, VehicleClass::Bicycle, edge, None),
            Ok(true)
        );
        assert_eq!(add_restricted_lane(&mut state, VehicleClass::Bus, edge, None), Ok(true));

        let lanes = state.network.lanes_of(edge);
        assert_eq!(lanes.len(), 4);
        assert_eq!(allow_of(&state, lanes[0]), "pedestrian");
        assert_eq!(allow_of(&state, lanes[1]), "bicycle");
        assert_eq!(allow_of(&state, lanes[2]), "bus");
        assert_eq!(state.network.lane(lanes[3]).expect("Spur").id, "E0_3");

        assert_eq!(
            add_restricted_lane(&mut state, VehicleClass::Bicycle, edge, None),
            Ok(false)
        );
        assert_eq!(
            add_restricted_lane(&mut state, VehicleClass::Ignoring, edge, Some(9)),
            Ok(false)
        );
    }

    #[test]
    fn adding_a_restricted_lane_is_one_undo_step() {
        let mut state = EditorState::new();
        let edge = edge_with_lanes(&mut state, 2);
        let before = state.network.content();

        add_restricted_lane(&mut state, VehicleClass::Pedestrian, edge, None).expect("ok");
        assert_eq!(state.network.lanes_of(edge).len(), 3);

        state.undo().expect("undo");
        assert_eq!(state.network.content(), before);
    }

    #[test]
    fn removing_restricted_lane() {
        let mut state = EditorState::new();
        let edge = edge_with_lanes(&mut state, 1);
        add_restricted_lane(&mut state, VehicleClass::Bicycle, edge, None).expect("ok");

        assert_eq!(
            remove_restricted_lane(&mut state, VehicleClass::Bicycle, edge),
            Ok(true)
        );
        assert_eq!(state.network.lanes_of(edge).len(), 1);
        assert_eq!(
            remove_restricted_lane(&mut state, VehicleClass::Bicycle, edge),
            Ok(false)
        );
    }
}
