//! # Section Reordering
//!
//! Moves one top-level section to another section's slot. Indices count
//! sections only; non-section fields between them keep their absolute
//! positions unless the move itself shifts them.
//!
//! A missing target, or a target equal to the source, is a no-op. A source
//! index past the last section is a no-op. A target index past the last
//! section moves the source to the end of the whole field list.

use crate::schema::Field;

/// Reorder the top-level sections of `fields`, returning a new list.
///
/// `from` and `to` are indices into the section-only sequence. The input
/// is left untouched.
pub fn reorder_top_level_section(fields: &[Field], from: usize, to: Option<usize>) -> Vec<Field> {
    reorder_matching(fields, from, to, Field::is_section)
}

/// Positional move among the items selected by `is_movable`.
///
/// The item at movable index `from` is removed and reinserted at the
/// absolute position the movable item at index `to` occupied, or at the
/// end when `to` is out of range.
pub fn reorder_matching<T, P>(items: &[T], from: usize, to: Option<usize>, is_movable: P) -> Vec<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
{
    let mut out = items.to_vec();
    let Some(to) = to else {
        return out;
    };
    if from == to {
        return out;
    }

    let positions: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| is_movable(item))
        .map(|(i, _)| i)
        .collect();

    let Some(&source) = positions.get(from) else {
        return out;
    };
    let target = positions.get(to).copied().unwrap_or(items.len());

    let moved = out.remove(source);
    let at = target.min(out.len());
    out.insert(at, moved);
    out
}
