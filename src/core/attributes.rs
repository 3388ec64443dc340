//! Einheitliche Attribut-Schnittstelle über alle Elementtypen.

use glam::Vec2;

use super::{Element, ElementHandle, JunctionType, NetError, NetResult};

/// Attributschlüssel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    Id,
    Position,
    JunctionType,
    Shape,
    Speed,
    Priority,
    EdgeType,
    Width,
    Allow,
    /// Spur-Index; nur intern änderbar
    Index,
    StartPos,
    EndPos,
    Name,
    Edges,
    Depart,
    Begin,
    End,
    Selected,
    /// Freier Parameter (Additionals, Demand, Generic Data)
    Param(String),
}

/// Attributwert.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    Point(Vec2),
    Shape(Vec<Vec2>),
    Handles(Vec<ElementHandle>),
    JunctionType(JunctionType),
    /// Nicht gesetztes optionales Attribut
    Empty,
}

const JUNCTION_KEYS: &[AttrKey] = &[
    AttrKey::Id,
    AttrKey::Position,
    AttrKey::JunctionType,
    AttrKey::Selected,
];
const EDGE_KEYS: &[AttrKey] = &[
    AttrKey::Id,
    AttrKey::Shape,
    AttrKey::Speed,
    AttrKey::Priority,
    AttrKey::EdgeType,
    AttrKey::Selected,
];
const LANE_KEYS: &[AttrKey] = &[
    AttrKey::Id,
    AttrKey::Index,
    AttrKey::Speed,
    AttrKey::Width,
    AttrKey::Allow,
    AttrKey::Selected,
];
const CROSSING_KEYS: &[AttrKey] = &[
    AttrKey::Id,
    AttrKey::Edges,
    AttrKey::Width,
    AttrKey::Priority,
    AttrKey::Selected,
];
const ADDITIONAL_KEYS: &[AttrKey] = &[
    AttrKey::Id,
    AttrKey::StartPos,
    AttrKey::EndPos,
    AttrKey::Position,
    AttrKey::Shape,
    AttrKey::Edges,
    AttrKey::Name,
    AttrKey::Selected,
];
const DEMAND_KEYS: &[AttrKey] = &[
    AttrKey::Id,
    AttrKey::Depart,
    AttrKey::Edges,
    AttrKey::StartPos,
    AttrKey::Selected,
];
const DATA_SET_KEYS: &[AttrKey] = &[AttrKey::Id, AttrKey::Selected];
const DATA_INTERVAL_KEYS: &[AttrKey] = &[AttrKey::Id, AttrKey::Begin, AttrKey::End];
const GENERIC_DATA_KEYS: &[AttrKey] = &[AttrKey::Id, AttrKey::Selected];

fn type_mismatch(key: &AttrKey, value: &AttrValue) -> NetError {
    NetError::invalid(format!("Wert {:?} passt nicht zu Attribut {:?}", value, key))
}

fn unsupported(key: &AttrKey, element: &Element) -> NetError {
    NetError::invalid(format!(
        "Attribut {:?} existiert nicht für {}",
        key,
        element.category()
    ))
}

fn positive(key: &AttrKey, value: f64) -> NetResult<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value as f32)
    } else {
        Err(NetError::invalid(format!(
            "{:?} muss positiv sein (war {})",
            key, value
        )))
    }
}

fn finite_point(key: &AttrKey, p: Vec2) -> NetResult<Vec2> {
    if p.is_finite() {
        Ok(p)
    } else {
        Err(NetError::invalid(format!(
            "{:?} muss endlich sein (war {})",
            key, p
        )))
    }
}

fn finite_shape(key: &AttrKey, shape: Vec<Vec2>) -> NetResult<Vec<Vec2>> {
    for p in &shape {
        finite_point(key, *p)?;
    }
    Ok(shape)
}

fn optional_offset(key: &AttrKey, value: &AttrValue) -> NetResult<Option<f32>> {
    match value {
        AttrValue::Empty => Ok(None),
        AttrValue::Float(v) if v.is_finite() && *v >= 0.0 => Ok(Some(*v as f32)),
        AttrValue::Float(v) => Err(NetError::invalid(format!(
            "{:?} darf nicht negativ sein (war {})",
            key, v
        ))),
        other => Err(type_mismatch(key, other)),
    }
}

fn offset_value(offset: Option<f32>) -> AttrValue {
    offset.map_or(AttrValue::Empty, |v| AttrValue::Float(v as f64))
}

impl Element {
    /// Alle festen Attributschlüssel dieses Elementtyps.
    pub fn attribute_keys(&self) -> &'static [AttrKey] {
        match self {
            Element::Junction(_) => JUNCTION_KEYS,
            Element::Edge(_) => EDGE_KEYS,
            Element::Lane(_) => LANE_KEYS,
            Element::Crossing(_) => CROSSING_KEYS,
            Element::Additional(_) => ADDITIONAL_KEYS,
            Element::Demand(_) => DEMAND_KEYS,
            Element::DataSet(_) => DATA_SET_KEYS,
            Element::DataInterval(_) => DATA_INTERVAL_KEYS,
            Element::GenericData(_) => GENERIC_DATA_KEYS,
        }
    }

    /// Liest ein Attribut; `None` wenn der Typ es nicht kennt.
    pub fn get_attribute(&self, key: &AttrKey) -> Option<AttrValue> {
        if *key == AttrKey::Id {
            return Some(AttrValue::Str(self.id().to_string()));
        }
        if *key == AttrKey::Selected {
            return match self {
                Element::DataInterval(_) => None,
                other => Some(AttrValue::Bool(other.is_selected())),
            };
        }
        match (self, key) {
            (Element::Junction(j), AttrKey::Position) => Some(AttrValue::Point(j.position)),
            (Element::Junction(j), AttrKey::JunctionType) => {
                Some(AttrValue::JunctionType(j.junction_type))
            }
            (Element::Edge(e), AttrKey::Shape) => Some(AttrValue::Shape(e.inner_shape.clone())),
            (Element::Edge(e), AttrKey::Speed) => Some(AttrValue::Float(e.speed as f64)),
            (Element::Edge(e), AttrKey::Priority) => Some(AttrValue::Int(e.priority as i64)),
            (Element::Edge(e), AttrKey::EdgeType) => Some(AttrValue::Str(e.edge_type.clone())),
            (Element::Lane(l), AttrKey::Index) => Some(AttrValue::Int(l.index as i64)),
            (Element::Lane(l), AttrKey::Speed) => Some(AttrValue::Float(l.speed as f64)),
            (Element::Lane(l), AttrKey::Width) => Some(AttrValue::Float(l.width as f64)),
            (Element::Lane(l), AttrKey::Allow) => Some(AttrValue::Str(l.allow.clone())),
            (Element::Crossing(c), AttrKey::Edges) => Some(AttrValue::Handles(c.edges.clone())),
            (Element::Crossing(c), AttrKey::Width) => Some(AttrValue::Float(c.width as f64)),
            (Element::Crossing(c), AttrKey::Priority) => Some(AttrValue::Bool(c.priority)),
            (Element::Additional(a), AttrKey::StartPos) => Some(offset_value(a.start)),
            (Element::Additional(a), AttrKey::EndPos) => Some(offset_value(a.end)),
            (Element::Additional(a), AttrKey::Position) => {
                Some(a.position.map_or(AttrValue::Empty, AttrValue::Point))
            }
            (Element::Additional(a), AttrKey::Shape) => Some(AttrValue::Shape(a.shape.clone())),
            (Element::Additional(a), AttrKey::Edges) => Some(AttrValue::Handles(a.edges.clone())),
            (Element::Additional(a), AttrKey::Name) => Some(AttrValue::Str(a.name.clone())),
            (Element::Additional(a), AttrKey::Param(name)) => Some(
                a.params
                    .get(name)
                    .map_or(AttrValue::Empty, |v| AttrValue::Str(v.clone())),
            ),
            (Element::Demand(d), AttrKey::Depart) => Some(AttrValue::Float(d.depart)),
            (Element::Demand(d), AttrKey::Edges) => Some(AttrValue::Handles(d.edges.clone())),
            (Element::Demand(d), AttrKey::StartPos) => Some(offset_value(d.position)),
            (Element::Demand(d), AttrKey::Param(name)) => Some(
                d.params
                    .get(name)
                    .map_or(AttrValue::Empty, |v| AttrValue::Str(v.clone())),
            ),
            (Element::DataInterval(i), AttrKey::Begin) => Some(AttrValue::Float(i.begin)),
            (Element::DataInterval(i), AttrKey::End) => Some(AttrValue::Float(i.end)),
            (Element::GenericData(g), AttrKey::Param(name)) => Some(
                g.params
                    .get(name)
                    .map_or(AttrValue::Empty, |v| AttrValue::Str(v.clone())),
            ),
            _ => None,
        }
    }

    /// Lehnt nicht-endliche Koordinaten in Position und Form ab.
    pub fn check_geometry(&self) -> NetResult<()> {
        match self {
            Element::Junction(j) => finite_point(&AttrKey::Position, j.position).map(|_| ()),
            Element::Edge(e) => e
                .inner_shape
                .iter()
                .try_for_each(|p| finite_point(&AttrKey::Shape, *p).map(|_| ())),
            Element::Additional(a) => {
                if let Some(p) = a.position {
                    finite_point(&AttrKey::Position, p)?;
                }
                a.shape
                    .iter()
                    .try_for_each(|p| finite_point(&AttrKey::Shape, *p).map(|_| ()))
            }
            _ => Ok(()),
        }
    }

    /// Setzt ein Attribut mit Typ- und Wertprüfung und liefert den alten Wert.
    ///
    /// Die ID ist hier nicht änderbar; Umbenennen läuft über den Store, damit
    /// der ID-Index konsistent bleibt.
    pub fn set_attribute(&mut self, key: &AttrKey, value: AttrValue) -> NetResult<AttrValue> {
        let old = self
            .get_attribute(key)
            .ok_or_else(|| unsupported(key, self))?;
        if *key == AttrKey::Id {
            return Err(NetError::invalid("ID nur über Umbenennen änderbar"));
        }

        match (self, key, value) {
            (Element::Junction(j), AttrKey::Position, AttrValue::Point(p)) => {
                j.position = finite_point(key, p)?
            }
            (Element::Junction(j), AttrKey::JunctionType, AttrValue::JunctionType(t)) => {
                j.junction_type = t
            }
            (Element::Junction(j), AttrKey::Selected, AttrValue::Bool(b)) => j.selected = b,
            (Element::Edge(e), AttrKey::Shape, AttrValue::Shape(s)) => {
                e.inner_shape = finite_shape(key, s)?
            }
            (Element::Edge(e), AttrKey::Speed, AttrValue::Float(v)) => e.speed = positive(key, v)?,
            (Element::Edge(e), AttrKey::Priority, AttrValue::Int(v)) => {
                e.priority = i32::try_from(v)
                    .map_err(|_| NetError::invalid(format!("Priorität {} zu groß", v)))?
            }
            (Element::Edge(e), AttrKey::EdgeType, AttrValue::Str(s)) => e.edge_type = s,
            (Element::Edge(e), AttrKey::Selected, AttrValue::Bool(b)) => e.selected = b,
            (Element::Lane(l), AttrKey::Index, AttrValue::Int(v)) => {
                l.index = usize::try_from(v)
                    .map_err(|_| NetError::invalid(format!("Spur-Index {} ungültig", v)))?
            }
            (Element::Lane(l), AttrKey::Speed, AttrValue::Float(v)) => l.speed = positive(key, v)?,
            (Element::Lane(l), AttrKey::Width, AttrValue::Float(v)) => l.width = positive(key, v)?,
            (Element::Lane(l), AttrKey::Allow, AttrValue::Str(s)) => l.allow = s,
            (Element::Lane(l), AttrKey::Selected, AttrValue::Bool(b)) => l.selected = b,
            (Element::Crossing(c), AttrKey::Edges, AttrValue::Handles(h)) => c.edges = h,
            (Element::Crossing(c), AttrKey::Width, AttrValue::Float(v)) => {
                c.width = positive(key, v)?
            }
            (Element::Crossing(c), AttrKey::Priority, AttrValue::Bool(b)) => c.priority = b,
            (Element::Crossing(c), AttrKey::Selected, AttrValue::Bool(b)) => c.selected = b,
            (Element::Additional(a), AttrKey::StartPos, v) => a.start = optional_offset(key, &v)?,
            (Element::Additional(a), AttrKey::EndPos, v) => a.end = optional_offset(key, &v)?,
            (Element::Additional(a), AttrKey::Position, AttrValue::Point(p)) => {
                a.position = Some(finite_point(key, p)?)
            }
            (Element::Additional(a), AttrKey::Position, AttrValue::Empty) => a.position = None,
            (Element::Additional(a), AttrKey::Shape, AttrValue::Shape(s)) => {
                a.shape = finite_shape(key, s)?
            }
            (Element::Additional(a), AttrKey::Edges, AttrValue::Handles(h)) => a.edges = h,
            (Element::Additional(a), AttrKey::Name, AttrValue::Str(s)) => a.name = s,
            (Element::Additional(a), AttrKey::Selected, AttrValue::Bool(b)) => a.selected = b,
            (Element::Additional(a), AttrKey::Param(name), AttrValue::Str(s)) => {
                a.params.insert(name.clone(), s);
            }
            (Element::Additional(a), AttrKey::Param(name), AttrValue::Empty) => {
                a.params.remove(name);
            }
            (Element::Demand(d), AttrKey::Depart, AttrValue::Float(v)) => {
                if !v.is_finite() || v < 0.0 {
                    return Err(NetError::invalid(format!("Abfahrtszeit {} ungültig", v)));
                }
                d.depart = v
            }
            (Element::Demand(d), AttrKey::Edges, AttrValue::Handles(h)) => d.edges = h,
            (Element::Demand(d), AttrKey::StartPos, v) => d.position = optional_offset(key, &v)?,
            (Element::Demand(d), AttrKey::Selected, AttrValue::Bool(b)) => d.selected = b,
            (Element::Demand(d), AttrKey::Param(name), AttrValue::Str(s)) => {
                d.params.insert(name.clone(), s);
            }
            (Element::Demand(d), AttrKey::Param(name), AttrValue::Empty) => {
                d.params.remove(name);
            }
            (Element::DataSet(s), AttrKey::Selected, AttrValue::Bool(b)) => s.selected = b,
            (Element::DataInterval(i), AttrKey::Begin, AttrValue::Float(v)) => {
                if !v.is_finite() || v >= i.end {
                    return Err(NetError::invalid(format!(
                        "Intervall-Beginn {} muss vor dem Ende {} liegen",
                        v, i.end
                    )));
                }
                i.begin = v
            }
            (Element::DataInterval(i), AttrKey::End, AttrValue::Float(v)) => {
                if !v.is_finite() || v <= i.begin {
                    return Err(NetError::invalid(format!(
                        "Intervall-Ende {} muss nach dem Beginn {} liegen",
                        v, i.begin
                    )));
                }
                i.end = v
            }
            (Element::GenericData(g), AttrKey::Selected, AttrValue::Bool(b)) => g.selected = b,
            (Element::GenericData(g), AttrKey::Param(name), AttrValue::Str(s)) => {
                g.params.insert(name.clone(), s);
            }
            (Element::GenericData(g), AttrKey::Param(name), AttrValue::Empty) => {
                g.params.remove(name);
            }
            (_, key, value) => return Err(type_mismatch(key, &value)),
        }
        Ok(old)
    }
}

impl AttrKey {
    /// Attribute, deren Änderung Verbindungen oder Ampellogik beeinflusst.
    pub fn affects_topology(&self) -> bool {
        matches!(
            self,
            AttrKey::Position
                | AttrKey::JunctionType
                | AttrKey::Shape
                | AttrKey::Speed
                | AttrKey::Priority
                | AttrKey::Allow
                | AttrKey::Index
        )
    }

    /// Attribute, die die Lage im Spatial-Index verändern.
    pub fn affects_geometry(&self) -> bool {
        matches!(
            self,
            AttrKey::Position | AttrKey::Shape | AttrKey::StartPos | AttrKey::EndPos
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataInterval, Junction, Lane};

    #[test]
    fn set_returns_previous_value() {
        let mut junction = Element::Junction(Junction::new("J0", Vec2::ZERO));
        let old = junction
            .set_attribute(&AttrKey::Position, AttrValue::Point(Vec2::new(3.0, 4.0)))
            .expect("Position setzbar");

        assert_eq!(old, AttrValue::Point(Vec2::ZERO));
        assert_eq!(
            junction.get_attribute(&AttrKey::Position),
            Some(AttrValue::Point(Vec2::new(3.0, 4.0)))
        );
    }

    #[test]
    fn set_rejects_wrong_types_and_unknown_keys() {
        let mut lane = Element::Lane(Lane {
            id: "E0_0".to_string(),
            index: 0,
            speed: 13.89,
            width: 3.2,
            allow: String::new(),
            selected: false,
        });

        assert!(lane
            .set_attribute(&AttrKey::Speed, AttrValue::Str("schnell".into()))
            .is_err());
        assert!(lane
            .set_attribute(&AttrKey::Depart, AttrValue::Float(1.0))
            .is_err());
        assert!(lane
            .set_attribute(&AttrKey::Width, AttrValue::Float(-1.0))
            .is_err());
        assert!(lane
            .set_attribute(&AttrKey::Id, AttrValue::Str("x".into()))
            .is_err());
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let mut junction = Element::Junction(Junction::new("J0", Vec2::ZERO));

        assert!(junction
            .set_attribute(&AttrKey::Position, AttrValue::Point(Vec2::new(f32::NAN, 1.0)))
            .is_err());
        assert!(junction
            .set_attribute(
                &AttrKey::Position,
                AttrValue::Point(Vec2::new(0.0, f32::INFINITY))
            )
            .is_err());
        assert_eq!(
            junction.get_attribute(&AttrKey::Position),
            Some(AttrValue::Point(Vec2::ZERO))
        );

        let broken = Element::Junction(Junction::new("J1", Vec2::splat(f32::NAN)));
        assert!(broken.check_geometry().is_err());
        assert!(junction.check_geometry().is_ok());
    }

    #[test]
    fn interval_bounds_stay_ordered() {
        let mut interval = Element::DataInterval(DataInterval {
            id: "interval_0".to_string(),
            begin: 0.0,
            end: 100.0,
        });

        assert!(interval
            .set_attribute(&AttrKey::Begin, AttrValue::Float(150.0))
            .is_err());
        assert!(interval
            .set_attribute(&AttrKey::End, AttrValue::Float(50.0))
            .is_ok());
    }

    #[test]
    fn every_listed_key_is_readable() {
        let junction = Element::Junction(Junction::new("J0", Vec2::ZERO));
        for key in junction.attribute_keys() {
            assert!(junction.get_attribute(key).is_some(), "{:?} fehlt", key);
        }
    }
}
