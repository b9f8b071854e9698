use rubix_common::{CullMode, FillMode};
use std::fmt;

/// The prebuilt pipeline state objects. Only the rasterizer state differs
/// between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineVariant {
    Opaque,
    Wireframe,
    FrontCull,
    BackCull,
}

/// Rasterizer settings baked into a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterState {
    pub fill: FillMode,
    pub cull: CullMode,
}

/// Variant per `[fill][cull]`. A cull choice takes precedence over wireframe.
const PIPELINE_TABLE: [[PipelineVariant; 3]; 2] = [
    [
        PipelineVariant::Opaque,
        PipelineVariant::FrontCull,
        PipelineVariant::BackCull,
    ],
    [
        PipelineVariant::Wireframe,
        PipelineVariant::FrontCull,
        PipelineVariant::BackCull,
    ],
];

impl PipelineVariant {
    pub const ALL: [PipelineVariant; 4] = [
        PipelineVariant::Opaque,
        PipelineVariant::Wireframe,
        PipelineVariant::FrontCull,
        PipelineVariant::BackCull,
    ];

    /// Pick the pipeline for the user's current fill and cull modes.
    pub fn select(fill: FillMode, cull: CullMode) -> Self {
        let row = match fill {
            FillMode::Solid => 0,
            FillMode::Wireframe => 1,
        };
        let col = match cull {
            CullMode::None => 0,
            CullMode::Front => 1,
            CullMode::Back => 2,
        };
        PIPELINE_TABLE[row][col]
    }

    pub fn raster_state(self) -> RasterState {
        let (fill, cull) = match self {
            PipelineVariant::Opaque => (FillMode::Solid, CullMode::None),
            PipelineVariant::Wireframe => (FillMode::Wireframe, CullMode::None),
            PipelineVariant::FrontCull => (FillMode::Solid, CullMode::Front),
            PipelineVariant::BackCull => (FillMode::Solid, CullMode::Back),
        };
        RasterState { fill, cull }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            PipelineVariant::Opaque => "opaque",
            PipelineVariant::Wireframe => "opaque_wireframe",
            PipelineVariant::FrontCull => "opaque_front_cull",
            PipelineVariant::BackCull => "opaque_back_cull",
        }
    }
}

impl fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_table() {
        use CullMode as C;
        use FillMode as F;
        use PipelineVariant as P;
        let cases = [
            (F::Solid, C::None, P::Opaque),
            (F::Solid, C::Front, P::FrontCull),
            (F::Solid, C::Back, P::BackCull),
            (F::Wireframe, C::None, P::Wireframe),
            (F::Wireframe, C::Front, P::FrontCull),
            (F::Wireframe, C::Back, P::BackCull),
        ];
        for (fill, cull, expected) in cases {
            assert_eq!(PipelineVariant::select(fill, cull), expected, "{fill:?}/{cull:?}");
        }
    }

    #[test]
    fn indices_are_dense() {
        for (i, variant) in PipelineVariant::ALL.iter().enumerate() {
            assert_eq!(variant.index(), i);
        }
    }

    #[test]
    fn raster_states_differ_per_variant() {
        let states: Vec<_> = PipelineVariant::ALL.iter().map(|v| v.raster_state()).collect();
        for i in 0..states.len() {
            for j in i + 1..states.len() {
                assert_ne!(states[i], states[j]);
            }
        }
    }
}
