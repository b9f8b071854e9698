use rubix_common::Face;

/// Buffer indices of the nine sub-cubes each face turn moves.
///
/// The sets are fixed at build time and never follow the cubes around: a
/// face turn always rotates the same nine slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceSets {
    sets: [[usize; 9]; 6],
}

impl Default for FaceSets {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceSets {
    pub fn new() -> Self {
        let mut sets = [[0; 9]; 6];
        for face in Face::ALL {
            sets[face.index()] = Self::layer(face);
        }
        Self { sets }
    }

    /// The nine indices whose grid coordinate on the face axis sits on the
    /// face's side.
    fn layer(face: Face) -> [usize; 9] {
        let mut out = [0; 9];
        let mut n = 0;
        for i in 0..27 {
            let (x, y, z) = (i / 9, (i / 3) % 3, i % 3);
            let hit = match face {
                Face::Left => x == 0,
                Face::Right => x == 2,
                Face::Bottom => y == 0,
                Face::Top => y == 2,
                Face::Front => z == 0,
                Face::Back => z == 2,
            };
            if hit {
                out[n] = i;
                n += 1;
            }
        }
        out
    }

    pub fn members(&self, face: Face) -> &[usize; 9] {
        &self.sets[face.index()]
    }

    pub fn contains(&self, face: Face, index: usize) -> bool {
        self.members(face).contains(&index)
    }
}
