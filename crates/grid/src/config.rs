//! Configuration for boundary tracing, point location and rasterization.

/// How the active-pillar outline is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryMode {
    /// One simple ring per connected boundary component.
    #[default]
    Components,
    /// All components chained into one ring, jumping back to the first seed
    /// between components. Matches outlines produced by older tools.
    Bridged,
}

/// What `locate` does when the layer search in a column finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverturnedPolicy {
    /// Trust the binary search and report a miss.
    #[default]
    Reject,
    /// Retry with a top-down scan of every layer.
    LinearScan,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocateConfig {
    pub overturned: OverturnedPolicy,
}

/// Which geometry the rasterizer samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    /// Cell face corners, with bridging patches across faults.
    #[default]
    CornerPoint,
    /// Quads through face centres of neighbouring columns.
    CellCenters,
}

#[derive(Debug, Clone, Copy)]
pub struct RasterConfig {
    /// Horizontal distance above which two shared corners count as split by a fault.
    pub fault_tolerance: f64,
    pub mode: RasterMode,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            fault_tolerance: 1e-8,
            mode: RasterMode::CornerPoint,
        }
    }
}

/// Top-level configuration carried by a `CornerPointGrid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridConfig {
    pub boundary: BoundaryMode,
    pub locate: LocateConfig,
    pub raster: RasterConfig,
    /// Thresholds for the plane and line primitives.
    pub tolerance: pillargrid_geometry::Tolerance,
}

impl GridConfig {
    /// Bridged outlines, as older consumers expect.
    pub fn compatible() -> Self {
        Self {
            boundary: BoundaryMode::Bridged,
            ..Self::default()
        }
    }

    /// Fall back to a full layer scan for overturned columns.
    pub fn exhaustive_locate() -> Self {
        Self {
            locate: LocateConfig {
                overturned: OverturnedPolicy::LinearScan,
            },
            ..Self::default()
        }
    }

    /// Rasterize through face centres instead of corners.
    pub fn cell_centers() -> Self {
        Self {
            raster: RasterConfig {
                mode: RasterMode::CellCenters,
                ..RasterConfig::default()
            },
            ..Self::default()
        }
    }
}
