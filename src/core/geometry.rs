//! Polylinien-Hilfsfunktionen (Länge, Projektion, Teilung, Versatz).

use glam::Vec2;

/// Gesamtlänge einer Polylinie.
pub fn length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Projiziert `point` auf die Polylinie.
///
/// Gibt `(Bogenlängen-Offset, Abstand zur Linie)` des nächstgelegenen Punkts zurück.
pub fn nearest_offset(points: &[Vec2], point: Vec2) -> Option<(f32, f32)> {
    match points {
        [] => None,
        [single] => Some((0.0, single.distance(point))),
        _ => {
            let mut best: Option<(f32, f32)> = None;
            let mut walked = 0.0;
            for w in points.windows(2) {
                let (a, b) = (w[0], w[1]);
                let seg = b - a;
                let seg_len_sq = seg.length_squared();
                let t = if seg_len_sq > f32::EPSILON {
                    ((point - a).dot(seg) / seg_len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let projected = a + seg * t;
                let distance = projected.distance(point);
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((walked + seg_len_sq.sqrt() * t, distance));
                }
                walked += seg_len_sq.sqrt();
            }
            best
        }
    }
}

/// Punkt bei Bogenlänge `offset` (auf die Linie begrenzt).
pub fn position_at(points: &[Vec2], offset: f32) -> Option<Vec2> {
    let first = *points.first()?;
    if offset <= 0.0 {
        return Some(first);
    }
    let mut walked = 0.0;
    for w in points.windows(2) {
        let seg_len = w[0].distance(w[1]);
        if walked + seg_len >= offset {
            if seg_len <= f32::EPSILON {
                return Some(w[1]);
            }
            let t = (offset - walked) / seg_len;
            return Some(w[0].lerp(w[1], t));
        }
        walked += seg_len;
    }
    points.last().copied()
}

/// Teilt die Polylinie bei Bogenlänge `offset`.
///
/// Beide Teile enthalten den Teilungspunkt; ohne den doppelten Punkt ergibt
/// ihre Verkettung wieder die Ausgangslinie. `None` wenn `offset` nicht
/// strikt innerhalb der Linie liegt.
pub fn split_at(points: &[Vec2], offset: f32) -> Option<(Vec<Vec2>, Vec<Vec2>)> {
    if points.len() < 2 || offset <= 0.0 || offset >= length(points) {
        return None;
    }
    let split_point = position_at(points, offset)?;

    let mut walked = 0.0;
    let mut segment = points.len() - 2;
    for (i, w) in points.windows(2).enumerate() {
        let seg_len = w[0].distance(w[1]);
        if walked + seg_len > offset {
            segment = i;
            break;
        }
        walked += seg_len;
    }

    let mut first: Vec<Vec2> = points[..=segment].to_vec();
    if first.last() != Some(&split_point) {
        first.push(split_point);
    }
    let mut second = vec![split_point];
    for &p in &points[segment + 1..] {
        if second.last() != Some(&p) {
            second.push(p);
        }
    }
    Some((first, second))
}

/// Achsenparallele Bounding-Box `(min, max)`.
pub fn bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
    )
}

/// Verschiebt die Polylinie seitlich; positive Werte nach links.
///
/// Jeder Punkt wird senkrecht zur Richtung zwischen seinen Nachbarn versetzt.
pub fn move_to_side(points: &[Vec2], distance: f32) -> Vec<Vec2> {
    let last = points.len().saturating_sub(1);
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let before = points[i.saturating_sub(1)];
            let after = points[(i + 1).min(last)];
            *p + (after - before).normalize_or_zero().perp() * distance
        })
        .collect()
}

/// Richtung am Anfang (`at_start`) bzw. Ende der Polylinie, normiert.
pub fn end_direction(points: &[Vec2], at_start: bool) -> Option<Vec2> {
    let direction = match points {
        [first, second, ..] if at_start => *second - *first,
        [.., before, last] => *last - *before,
        _ => return None,
    };
    direction.try_normalize()
}
