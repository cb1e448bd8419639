use crate::position::Position;
use crate::resource::ResourceKind;

/// Where the persistent panels go on a screen of a given size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub lists: [(ResourceKind, Position); 4],
    pub detail: Position,
}

/// Lists stacked top to bottom in the left half, detail on the right.
/// The last list absorbs rows left over by the division.
pub fn compute(width: i32, height: i32) -> Layout {
    let half = width / 2;
    let slice = height / 4;
    let mut lists = [(ResourceKind::Image, Position::clamped(0, 0, 1, 1)); 4];
    for (i, kind) in ResourceKind::ALL.into_iter().enumerate() {
        let top = slice * i as i32;
        let bottom = if i == 3 { height } else { top + slice };
        lists[i] = (kind, Position::clamped(0, top, half, bottom));
    }
    Layout {
        lists,
        detail: Position::clamped(half, 0, width, height),
    }
}
