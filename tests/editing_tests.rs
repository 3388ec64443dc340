//! Integrationstests für die Editing-Use-Cases:
//! - Kante teilen inklusive Kinder-Verschiebung
//! - Junctions verschmelzen und zusammenfassen
//! - Undo/Redo über Gruppen, Umbenennen und kaskadierendes Löschen
//! - Kanten ersetzen, Überwege und generische Daten
//! - Grenzfälle: viele Elemente auf einem Punkt, große Koordinaten, NaN

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use glam::Vec2;
use net_graph_editor::app::use_cases::editing::{
    create_additional, create_crossing, create_data_interval, create_data_set,
    create_demand_element, create_edge, create_generic_data, create_junction, delete_crossing,
    delete_element, delete_junction, join_junctions, join_selected_junctions, merge_junctions,
    rename, replace_incoming_edge, set_attribute, set_selected, split_edge, split_edges_bidi,
    EdgeCreateOptions,
};
use net_graph_editor::core::{
    Additional, AdditionalTag, DemandElement, DemandTag, GenericDataTag,
};
use net_graph_editor::{
    AttrKey, AttrValue, Category, EditorOptions, EditorState, ElementHandle, NetError,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn edge(state: &mut EditorState, from: ElementHandle, to: ElementHandle) -> ElementHandle {
    create_edge(state, from, to, None, None, EdgeCreateOptions::default())
        .expect("Kante erstellen")
        .expect("Kante sollte neu sein")
}

// ─── split_edge ──────────────────────────────────────────────────────────────

#[test]
fn test_split_edge_bei_40_erzeugt_zwei_teilstuecke() {
    init_logger();
    let mut state = EditorState::new();
    let j1 = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("J1");
    let j2 = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("J2");
    let first = edge(&mut state, j1, j2);
    assert_eq!(state.network.lanes_of(first).len(), 1);

    let j3 = split_edge(&mut state, first, Vec2::new(40.0, 0.0), None).expect("Teilen");

    let net = &state.network;
    let j3_pos = net.junction(j3).expect("J3").position;
    assert_relative_eq!(j3_pos.x, 40.0);
    assert_relative_eq!(j3_pos.y, 0.0);

    let second = net.lookup(Category::Edge, "E0.40").expect("zweites Teilstück");
    assert_eq!(net.edge(first).expect("erste Kante").from, j1);
    assert_eq!(net.edge(first).expect("erste Kante").to, j3);
    assert_eq!(net.edge(second).expect("zweite Kante").from, j3);
    assert_eq!(net.edge(second).expect("zweite Kante").to, j2);
    assert_eq!(net.lanes_of(first).len(), 1);
    assert_eq!(net.lanes_of(second).len(), 1);
    assert!(net.needs_recompute());
}

#[test]
fn test_split_edge_geometrien_ergeben_zusammen_das_original() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(100.0, 50.0)).expect("B");
    let options = EdgeCreateOptions {
        inner_shape: vec![Vec2::new(50.0, 0.0), Vec2::new(100.0, 0.0)],
        ..EdgeCreateOptions::default()
    };
    let original = create_edge(&mut state, a, b, None, None, options)
        .expect("ok")
        .expect("Kante");
    let before = state.network.edge_geometry(original).expect("Geometrie");

    let junction = split_edge(&mut state, original, Vec2::new(75.0, 0.0), None).expect("Teilen");

    let second = state
        .network
        .incident_edges(junction)
        .into_iter()
        .find(|e| *e != original)
        .expect("zweites Teilstück");
    let mut joined = state.network.edge_geometry(original).expect("Kopf");
    joined.extend(
        state
            .network
            .edge_geometry(second)
            .expect("Schwanz")
            .into_iter()
            .skip(1),
    );
    assert_eq!(joined.len(), before.len() + 1);
    let without_split: Vec<Vec2> = joined
        .iter()
        .copied()
        .filter(|p| p.distance(Vec2::new(75.0, 0.0)) > 1e-3)
        .collect();
    assert_eq!(without_split, before);
}

#[test]
fn test_split_edge_verschiebt_kinder_hinter_dem_teilungspunkt() {
    init_logger();
    let mut state = EditorState::new();
    let j1 = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("J1");
    let j2 = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("J2");
    let first = edge(&mut state, j1, j2);
    let lane = state.network.lanes_of(first)[0];
    let front = create_additional(
        &mut state,
        Additional {
            start: Some(10.0),
            end: Some(20.0),
            ..Additional::new("vorne", AdditionalTag::BusStop)
        },
        &[lane],
    )
    .expect("vordere Haltestelle");
    let back = create_additional(
        &mut state,
        Additional {
            start: Some(50.0),
            end: Some(60.0),
            ..Additional::new("hinten", AdditionalTag::BusStop)
        },
        &[lane],
    )
    .expect("hintere Haltestelle");

    split_edge(&mut state, first, Vec2::new(40.0, 0.0), None).expect("Teilen");

    let net = &state.network;
    let second = net.lookup(Category::Edge, "E0.40").expect("zweites Teilstück");
    let second_lane = net.lanes_of(second)[0];
    assert_eq!(net.parents(front), vec![lane]);
    assert_eq!(net.parents(back), vec![second_lane]);
    let moved = net.additional(back).expect("Haltestelle");
    assert_relative_eq!(moved.start.expect("Start"), 10.0);
    assert_relative_eq!(moved.end.expect("Ende"), 20.0);
}

#[test]
fn test_split_edge_neben_der_kante_wird_abgelehnt() {
    init_logger();
    let mut state = EditorState::new();
    let j1 = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("J1");
    let j2 = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("J2");
    let first = edge(&mut state, j1, j2);
    let before = state.network.content();

    let result = split_edge(&mut state, first, Vec2::new(40.0, 30.0), None);

    assert!(matches!(result, Err(NetError::InvalidOperation { .. })));
    assert_eq!(state.network.content(), before);
}

// ─── merge / join ────────────────────────────────────────────────────────────

#[test]
fn test_merge_junctions_entfernt_verbindende_kante() {
    init_logger();
    let mut state = EditorState::new();
    let ja = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("Ja");
    let jb = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("Jb");
    let jc = create_junction(&mut state, Vec2::new(0.0, 50.0)).expect("Jc");
    let jd = create_junction(&mut state, Vec2::new(-50.0, 0.0)).expect("Jd");
    let between = edge(&mut state, ja, jb);
    let incoming = edge(&mut state, jc, ja);
    let outgoing = edge(&mut state, ja, jd);

    merge_junctions(&mut state, ja, jb).expect("Verschmelzen");

    let net = &state.network;
    assert!(!net.contains(between));
    assert!(!net.contains(ja));
    assert_eq!(net.edge(incoming).expect("eingehend").to, jb);
    assert_eq!(net.edge(outgoing).expect("ausgehend").from, jb);
    let incident = net.incident_edges(jb);
    assert!(incident.contains(&incoming));
    assert!(incident.contains(&outgoing));
}

#[test]
fn test_join_nimmt_junction_auf_clusterposition_auf() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(10.0, 0.0)).expect("B");
    let c = create_junction(&mut state, Vec2::new(5.0, 0.0)).expect("C");
    let d = create_junction(&mut state, Vec2::new(5.0, 40.0)).expect("D");
    let cd = edge(&mut state, c, d);
    set_selected(&mut state, a, true).expect("A selektieren");
    set_selected(&mut state, b, true).expect("B selektieren");

    let outcome = join_selected_junctions(&mut state).expect("Zusammenfassen");

    assert_eq!(outcome.absorbed, vec![c]);
    let net = &state.network;
    for member in [a, b, c] {
        assert!(!net.contains(member));
    }
    let joined = net.junction(outcome.joined).expect("neue Junction");
    assert_relative_eq!(joined.position.x, 5.0);
    assert_relative_eq!(joined.position.y, 0.0);
    assert_eq!(net.edge(cd).expect("Kante").from, outcome.joined);

    state.undo().expect("Undo");
    assert!(state.network.contains(c));
    assert_eq!(state.network.edge(cd).expect("Kante").from, c);
}

// ─── Undo / Redo ─────────────────────────────────────────────────────────────

#[test]
fn test_undo_redo_ueber_zwei_gruppen() {
    init_logger();
    let mut state = EditorState::new();
    let empty = state.network.content();

    let j = create_junction(&mut state, Vec2::new(1.0, 2.0)).expect("Gruppe A");
    let with_j = state.network.content();
    delete_junction(&mut state, j).expect("Gruppe B");
    assert!(!state.network.contains(j));

    assert!(state.undo().expect("Undo B"));
    assert_eq!(state.network.content(), with_j);
    assert!(state.undo().expect("Undo A"));
    assert_eq!(state.network.content(), empty);
    assert!(!state.undo().expect("leerer Stack"));

    assert!(state.redo().expect("Redo A"));
    assert_eq!(state.network.content(), with_j);
    assert!(state.redo().expect("Redo B"));
    assert!(!state.network.contains(j));
    assert!(!state.can_redo());
}

#[test]
fn test_rename_und_undo() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("B");
    let ab = edge(&mut state, a, b);
    let old_id = state.network.junction(a).expect("A").id.clone();

    rename(&mut state, a, "Hauptknoten").expect("Umbenennen");

    let net = &state.network;
    assert!(matches!(
        net.lookup(Category::Junction, &old_id),
        Err(NetError::NotFound { .. })
    ));
    assert_eq!(net.lookup(Category::Junction, "Hauptknoten").expect("neu"), a);
    assert_eq!(net.incident_edges(a), vec![ab]);

    state.undo().expect("Undo");
    assert_eq!(state.network.lookup(Category::Junction, &old_id).expect("alt"), a);
    assert!(state
        .network
        .lookup(Category::Junction, "Hauptknoten")
        .is_err());
}

#[test]
fn test_rename_auf_belegte_id_wird_abgelehnt() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("B");
    let b_id = state.network.junction(b).expect("B").id.clone();

    let result = rename(&mut state, a, &b_id);

    assert!(matches!(result, Err(NetError::DuplicateId { .. })));
}

#[test]
fn test_undo_stellt_kaskadierend_geloeschte_elemente_wieder_her() {
    init_logger();
    let mut state = EditorState::new();
    let j1 = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("J1");
    let j2 = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("J2");
    let j3 = create_junction(&mut state, Vec2::new(100.0, 100.0)).expect("J3");
    let e12 = edge(&mut state, j1, j2);
    edge(&mut state, j2, j3);
    let lane = state.network.lanes_of(e12)[0];
    create_additional(
        &mut state,
        Additional {
            start: Some(10.0),
            end: Some(30.0),
            ..Additional::new("halt", AdditionalTag::BusStop)
        },
        &[lane],
    )
    .expect("Haltestelle");
    let before = state.network.content();
    let count_before = state.network.len();

    delete_junction(&mut state, j2).expect("Löschen");
    // J2, zwei Kanten, zwei Spuren und die Haltestelle
    assert_eq!(state.network.len(), count_before - 6);

    state.undo().expect("Undo");
    assert_eq!(state.network.content(), before);

    state.redo().expect("Redo");
    state.undo().expect("Undo");
    assert_eq!(state.network.content(), before);
}

// ─── Kanten ersetzen / beidseitig teilen ─────────────────────────────────────

#[test]
fn test_replace_incoming_edge_uebernimmt_kinder_und_routen() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("B");
    let c = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("C");
    let d = create_junction(&mut state, Vec2::new(50.0, 50.0)).expect("D");
    let which = edge(&mut state, a, b);
    let bc = edge(&mut state, b, c);
    let by = edge(&mut state, d, c);
    let which_lane = state.network.lanes_of(which)[0];
    let stop = create_additional(
        &mut state,
        Additional {
            start: Some(10.0),
            end: Some(20.0),
            ..Additional::new("halt", AdditionalTag::BusStop)
        },
        &[which_lane],
    )
    .expect("Haltestelle");
    let route = create_demand_element(
        &mut state,
        DemandElement {
            edges: vec![which, bc],
            ..DemandElement::new("", DemandTag::Route)
        },
        &[],
    )
    .expect("Route");
    let before = state.network.content();

    replace_incoming_edge(&mut state, which, by).expect("Ersetzen");

    let net = &state.network;
    assert!(!net.contains(which));
    assert_eq!(net.edge(by).expect("Ersatz").to, b);
    assert_eq!(net.parents(stop), vec![net.lanes_of(by)[0]]);
    assert_eq!(net.demand(route).expect("Route").edges, vec![by, bc]);

    state.undo().expect("Undo");
    assert_eq!(state.network.content(), before);
}

#[test]
fn test_replace_incoming_edge_durch_sich_selbst_wird_abgelehnt() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("B");
    let ab = edge(&mut state, a, b);

    let result = replace_incoming_edge(&mut state, ab, ab);

    assert!(matches!(result, Err(NetError::InvalidOperation { .. })));
}

#[test]
fn test_split_edges_bidi_teilt_beide_richtungen_an_einer_junction() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("B");
    let ab = edge(&mut state, a, b);
    let ba = edge(&mut state, b, a);

    let middle = split_edges_bidi(&mut state, ab, ba, Vec2::new(40.0, 0.0)).expect("Teilen");

    let net = &state.network;
    assert_eq!(net.edges().len(), 4);
    assert_eq!(net.incident_edges(middle).len(), 4);
    assert_eq!(net.edge(ab).expect("AB").to, middle);
    assert_eq!(net.edge(ba).expect("BA").to, middle);
    let pos = net.junction(middle).expect("Mitte").position;
    assert_relative_eq!(pos.x, 40.0);
    assert_relative_eq!(pos.y, 0.0);
}

#[test]
fn test_split_edges_bidi_ohne_gegenkante_wird_abgelehnt() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("B");
    let c = create_junction(&mut state, Vec2::new(100.0, 100.0)).expect("C");
    let ab = edge(&mut state, a, b);
    let bc = edge(&mut state, b, c);
    let before = state.network.content();

    let result = split_edges_bidi(&mut state, ab, bc, Vec2::new(40.0, 0.0));

    assert!(matches!(result, Err(NetError::InvalidOperation { .. })));
    assert_eq!(state.network.content(), before);
}

// ─── Überwege ────────────────────────────────────────────────────────────────

#[test]
fn test_crossing_anlegen_loeschen_und_undo() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("B");
    let c = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("C");
    let d = create_junction(&mut state, Vec2::new(150.0, 0.0)).expect("D");
    let ab = edge(&mut state, a, b);
    let cd = edge(&mut state, c, d);

    assert!(matches!(
        create_crossing(&mut state, b, vec![cd]),
        Err(NetError::InvalidOperation { .. })
    ));
    assert!(matches!(
        create_crossing(&mut state, b, Vec::new()),
        Err(NetError::InvalidOperation { .. })
    ));

    let crossing = create_crossing(&mut state, b, vec![ab]).expect("Überweg");
    assert_eq!(state.network.crossings_of(b), vec![crossing]);
    assert!(!state.network.junction(b).expect("B").logic_valid);
    let with_crossing = state.network.content();

    delete_crossing(&mut state, crossing).expect("Löschen");
    assert!(state.network.crossings_of(b).is_empty());

    state.undo().expect("Undo");
    assert_eq!(state.network.content(), with_crossing);
}

#[test]
fn test_delete_junction_entfernt_crossings_der_nachbarn() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("B");
    let c = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("C");
    let d = create_junction(&mut state, Vec2::new(100.0, 50.0)).expect("D");
    edge(&mut state, a, b);
    let bc = edge(&mut state, b, c);
    let cd = edge(&mut state, c, d);
    let over_bc = create_crossing(&mut state, c, vec![bc]).expect("Überweg BC");
    let over_cd = create_crossing(&mut state, c, vec![cd]).expect("Überweg CD");

    delete_junction(&mut state, b).expect("Löschen");

    let net = &state.network;
    assert!(!net.contains(over_bc));
    assert!(net.contains(over_cd));
    assert_eq!(net.crossings_of(c), vec![over_cd]);

    state.undo().expect("Undo");
    assert!(state.network.contains(over_bc));
}

// ─── Generische Daten ────────────────────────────────────────────────────────

#[test]
fn test_generic_data_braucht_ein_intervall() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(50.0, 0.0)).expect("B");
    let ab = edge(&mut state, a, b);
    let set = create_data_set(&mut state, None).expect("Data-Set");
    let params = BTreeMap::from([("speed".to_string(), "13.9".to_string())]);

    let without_interval =
        create_generic_data(&mut state, set, GenericDataTag::EdgeData, &[ab], params.clone());
    assert!(matches!(
        without_interval,
        Err(NetError::InvalidOperation { .. })
    ));

    let interval = create_data_interval(&mut state, set, 0.0, 3600.0).expect("Intervall");
    let same_edge_twice = create_generic_data(
        &mut state,
        interval,
        GenericDataTag::EdgeRelData,
        &[ab, ab],
        BTreeMap::new(),
    );
    assert!(matches!(
        same_edge_twice,
        Err(NetError::InvalidOperation { .. })
    ));

    let data = create_generic_data(&mut state, interval, GenericDataTag::EdgeData, &[ab], params)
        .expect("Kantendaten");
    let parents = state.network.parents(data);
    assert!(parents.contains(&interval));
    assert!(parents.contains(&ab));
}

// ─── Grenzfälle ──────────────────────────────────────────────────────────────

#[test]
fn test_hundert_pois_auf_einem_punkt_bleiben_abfragbar() {
    init_logger();
    let mut state = EditorState::new();
    let point = Vec2::new(1.0, 1.0);
    let pois: Vec<ElementHandle> = (0..100)
        .map(|_| {
            create_additional(
                &mut state,
                Additional {
                    position: Some(point),
                    ..Additional::new("", AdditionalTag::Poi)
                },
                &[],
            )
            .expect("POI")
        })
        .collect();

    let found = state
        .network
        .elements_in_rect(Vec2::ZERO, Vec2::splat(2.0));
    assert_eq!(found.len(), 100);
    assert!(state.network.nearest_element(point).is_some());

    for &poi in &pois[..60] {
        delete_element(&mut state, poi).expect("Löschen");
    }
    assert_eq!(
        state
            .network
            .elements_in_rect(Vec2::ZERO, Vec2::splat(2.0))
            .len(),
        40
    );

    state.undo().expect("Undo");
    assert_eq!(
        state
            .network
            .elements_in_rect(Vec2::ZERO, Vec2::splat(2.0))
            .len(),
        41
    );
}

#[test]
fn test_join_bei_utm_koordinaten_terminiert() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(5.0e6 - 10.0, 5.0e6 - 10.0)).expect("A");
    let middle = create_junction(&mut state, Vec2::new(5.0e6, 5.0e6)).expect("Mitte");
    let b = create_junction(&mut state, Vec2::new(5.0e6 + 10.0, 5.0e6 + 10.0)).expect("B");

    let outcome = join_junctions(&mut state, &[a, b]).expect("Zusammenfassen");

    assert_eq!(outcome.absorbed, vec![middle]);
    let joined = state.network.junction(outcome.joined).expect("neue Junction");
    assert_relative_eq!(joined.position.x, 5.0e6);
    assert_relative_eq!(joined.position.y, 5.0e6);
    assert_eq!(state.network.junctions(), vec![outcome.joined]);
}

#[test]
fn test_join_mit_schrittweite_null_wird_abgelehnt() {
    init_logger();
    let options = EditorOptions {
        junction_collision_step: 0.0,
        ..EditorOptions::default()
    };
    let mut state = EditorState::with_options(options);
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(10.0, 0.0)).expect("B");
    let before = state.network.content();

    let result = join_junctions(&mut state, &[a, b]);

    assert!(matches!(result, Err(NetError::InvalidOperation { .. })));
    assert_eq!(state.network.content(), before);
}

#[test]
fn test_split_name_rundet_und_weicht_belegten_ids_aus() {
    init_logger();
    let mut state = EditorState::new();
    let a = create_junction(&mut state, Vec2::new(0.0, 0.0)).expect("A");
    let b = create_junction(&mut state, Vec2::new(100.0, 0.0)).expect("B");
    let c = create_junction(&mut state, Vec2::new(0.0, 50.0)).expect("C");
    let d = create_junction(&mut state, Vec2::new(100.0, 50.0)).expect("D");
    let first = edge(&mut state, a, b);
    let other = edge(&mut state, c, d);
    rename(&mut state, other, "E0.40").expect("Umbenennen");
    assert_eq!(state.network.edge(first).expect("E0").id, "E0");

    split_edge(&mut state, first, Vec2::new(40.3, 0.0), None).expect("Teilen");

    let second = state
        .network
        .lookup(Category::Edge, "E0.41")
        .expect("ausweichende ID");
    let middle = state.network.edge(first).expect("E0").to;
    assert_eq!(state.network.edge(second).expect("Teilstück").from, middle);
    assert_eq!(state.network.lookup(Category::Edge, "E0.40"), Ok(other));
}

#[test]
fn test_nicht_endliche_position_wird_abgelehnt() {
    init_logger();
    let mut state = EditorState::new();
    let before = state.network.content();

    let result = create_junction(&mut state, Vec2::new(f32::NAN, 0.0));
    assert!(matches!(result, Err(NetError::InvalidOperation { .. })));
    assert_eq!(state.network.content(), before);

    let j = create_junction(&mut state, Vec2::new(1.0, 2.0)).expect("Junction");
    let moved = set_attribute(
        &mut state,
        j,
        AttrKey::Position,
        AttrValue::Point(Vec2::new(f32::INFINITY, 0.0)),
    );
    assert!(matches!(moved, Err(NetError::InvalidOperation { .. })));
    assert_eq!(
        state.network.junction(j).expect("Junction").position,
        Vec2::new(1.0, 2.0)
    );
}
