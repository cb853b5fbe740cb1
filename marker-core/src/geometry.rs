//! Marker placement engine.
//!
//! Every gesture update is turned into a requested center and size, which
//! [`clamp_geometry`] resolves into a marker that stays within the configured
//! size range and fully inside the canvas. Size is resolved first; any
//! overflow caused by a resize is then corrected by moving the marker, never
//! by shrinking it further.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Share of the host view width occupied by the canvas.
pub const CANVAS_WIDTH_FRACTION: f32 = 0.9;

/// Smallest marker, as a share of the canvas width.
pub const MIN_SIZE_FRACTION: f32 = 0.3;

/// Largest marker, as a share of the canvas width.
pub const MAX_SIZE_FRACTION: f32 = 0.9;

/// Slack allowed by [`MarkerGeometry::is_within`] for float rounding at the edges.
pub const CONTAINMENT_TOLERANCE: f32 = 1e-3;

/// A position in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The visible image area the marker must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasBounds {
    width: f32,
    height: f32,
}

impl CanvasBounds {
    /// Create canvas bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBounds`] unless both dimensions are finite
    /// and strictly positive.
    pub fn new(width: f32, height: f32) -> CoreResult<Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(CoreError::InvalidBounds { width, height })
        }
    }

    /// Canvas width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Center of the canvas.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Allowed marker size range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeConfig {
    min_size: f32,
    max_size: f32,
}

impl SizeConfig {
    /// Create a size range from explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSizeConfig`] unless `0 < min <= max` and
    /// both are finite.
    pub fn new(min_size: f32, max_size: f32) -> CoreResult<Self> {
        if min_size.is_finite() && max_size.is_finite() && min_size > 0.0 && min_size <= max_size
        {
            Ok(Self { min_size, max_size })
        } else {
            Err(CoreError::InvalidSizeConfig {
                min: min_size,
                max: max_size,
            })
        }
    }

    /// Derive the size range from the host view width using the default
    /// fractions: the canvas spans 90% of the host, and the marker ranges
    /// from 30% to 90% of the canvas width.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSizeConfig`] if the host width is not
    /// strictly positive.
    pub fn from_host_width(host_width: f32) -> CoreResult<Self> {
        Self::from_fractions(
            host_width,
            CANVAS_WIDTH_FRACTION,
            MIN_SIZE_FRACTION,
            MAX_SIZE_FRACTION,
        )
    }

    /// Derive the size range from the host view width with custom fractions.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSizeConfig`] if the derived limits do not
    /// form a valid range.
    pub fn from_fractions(
        host_width: f32,
        canvas_fraction: f32,
        min_fraction: f32,
        max_fraction: f32,
    ) -> CoreResult<Self> {
        let canvas_width = host_width * canvas_fraction;
        Self::new(canvas_width * min_fraction, canvas_width * max_fraction)
    }

    /// Smallest allowed marker size.
    #[must_use]
    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    /// Largest allowed marker size.
    #[must_use]
    pub fn max_size(&self) -> f32 {
        self.max_size
    }

    /// Clamp a requested size into the allowed range. NaN resolves to the minimum.
    #[must_use]
    pub fn clamp_size(&self, requested: f32) -> f32 {
        if requested.is_nan() {
            return self.min_size;
        }
        self.min_size.max(self.max_size.min(requested))
    }
}

/// Position and size of the square region the marker occupies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerGeometry {
    /// Center X in canvas coordinates.
    pub center_x: f32,
    /// Center Y in canvas coordinates.
    pub center_y: f32,
    /// Edge length of the bounding square.
    pub size: f32,
}

impl MarkerGeometry {
    /// Create a geometry without clamping.
    #[must_use]
    pub const fn new(center_x: f32, center_y: f32, size: f32) -> Self {
        Self {
            center_x,
            center_y,
            size,
        }
    }

    /// The starting marker: smallest size, centered on the canvas.
    #[must_use]
    pub fn default_for(bounds: CanvasBounds, config: SizeConfig) -> Self {
        clamp_geometry(bounds.center(), config.min_size(), bounds, config)
    }

    /// Marker center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Bounding square as `(left, top, width, height)`.
    #[must_use]
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let half = self.size / 2.0;
        (
            self.center_x - half,
            self.center_y - half,
            self.size,
            self.size,
        )
    }

    /// Check whether the bounding square lies inside the canvas, up to
    /// [`CONTAINMENT_TOLERANCE`] of float rounding.
    #[must_use]
    pub fn is_within(&self, bounds: CanvasBounds) -> bool {
        let half = self.size / 2.0;
        self.center_x - half >= -CONTAINMENT_TOLERANCE
            && self.center_y - half >= -CONTAINMENT_TOLERANCE
            && self.center_x + half <= bounds.width + CONTAINMENT_TOLERANCE
            && self.center_y + half <= bounds.height + CONTAINMENT_TOLERANCE
    }
}

/// Resolve a requested marker center and size into a valid geometry.
///
/// Never fails: out-of-range sizes saturate at the configured limits and
/// centers are pulled back so the bounding square touches the nearest edge.
/// Each axis is clamped independently. Containment holds whenever the
/// maximum size fits in both canvas dimensions.
#[must_use]
pub fn clamp_geometry(
    requested_center: Point,
    requested_size: f32,
    bounds: CanvasBounds,
    config: SizeConfig,
) -> MarkerGeometry {
    let size = config.clamp_size(requested_size);
    let half = size / 2.0;

    MarkerGeometry {
        center_x: clamp_axis(requested_center.x, half, bounds.width),
        center_y: clamp_axis(requested_center.y, half, bounds.height),
        size,
    }
}

fn clamp_axis(requested: f32, half: f32, extent: f32) -> f32 {
    // NaN fails both comparisons below; pin it to the leading edge.
    if requested.is_nan() || requested - half < 0.0 {
        half
    } else if requested + half > extent {
        extent - half
    } else {
        requested
    }
}
