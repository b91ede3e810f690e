/// Named layers, in draw order (later layers are drawn on top).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Trunks,
    Terrain,
    Filler,
    Leaves,
    FallingLeaves,
    Avatar,
}

impl Layer {
    pub const ALL: [Layer; 6] = [
        Layer::Trunks,
        Layer::Terrain,
        Layer::Filler,
        Layer::Leaves,
        Layer::FallingLeaves,
        Layer::Avatar,
    ];

    /// Ground-class colliders: the only thing a falling leaf lands on.
    #[inline]
    pub fn is_ground(self) -> bool {
        matches!(self, Layer::Terrain)
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::Trunks => "trunks",
            Layer::Terrain => "terrain",
            Layer::Filler => "filler",
            Layer::Leaves => "leaves",
            Layer::FallingLeaves => "falling_leaves",
            Layer::Avatar => "avatar",
        }
    }
}
