// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve data model shared by the reader and the writer

use nalgebra::Point3;

use crate::shift::CoordinateShift;

/// Minimum number of vertices for a curve to be kept or written
pub const MIN_VERTEX_COUNT: usize = 2;

/// SinusX curve type, identified by a one-character tag after `B`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CurveType {
    /// `S`: plain set of 3D points
    #[default]
    Set,
    /// `P`: profile
    Profile,
    /// `N`: planar curve at a constant altitude
    PlaneAtAltitude,
    /// `C`: circle (local frame and scale are skipped)
    Circle,
}

impl CurveType {
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'S' => Some(CurveType::Set),
            'P' => Some(CurveType::Profile),
            'N' => Some(CurveType::PlaneAtAltitude),
            'C' => Some(CurveType::Circle),
            _ => None,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            CurveType::Set => 'S',
            CurveType::Profile => 'P',
            CurveType::PlaneAtAltitude => 'N',
            CurveType::Circle => 'C',
        }
    }
}

/// Global axis considered "up" for a 2D curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UpAxis {
    X,
    Y,
    #[default]
    Z,
}

impl UpAxis {
    /// Decode a SinusX base plane: 0 = (XY), 1 = (YZ), 2 = (ZX)
    #[inline]
    pub fn from_base_plane(code: u8) -> Option<Self> {
        match code {
            0 => Some(UpAxis::Z),
            1 => Some(UpAxis::X),
            2 => Some(UpAxis::Y),
            _ => None,
        }
    }

    /// Inverse of [`UpAxis::from_base_plane`]
    #[inline]
    pub fn base_plane_code(&self) -> u8 {
        match self {
            UpAxis::Z => 0,
            UpAxis::X => 1,
            UpAxis::Y => 2,
        }
    }

    /// Axis index (0 = X, 1 = Y, 2 = Z)
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            UpAxis::X => 0,
            UpAxis::Y => 1,
            UpAxis::Z => 2,
        }
    }
}

/// A 3D polyline as exchanged through SinusX
///
/// Vertices are stored in the local frame: when `global_shift` is set,
/// `local = global - offset`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Polyline {
    pub name: String,
    pub vertices: Vec<Point3<f64>>,
    /// First and last vertex are implicitly connected
    pub closed: bool,
    /// Curve display flag; cleared for point sets declared "not connected"
    pub visible: bool,
    /// Vertex cloud display flag, set together with `visible = false`
    pub vertices_visible: bool,
    pub is_2d: bool,
    /// Only meaningful when `is_2d` is set
    pub up_axis: UpAxis,
    /// Set for `N` curves only
    pub const_altitude: Option<f64>,
    pub global_shift: Option<CoordinateShift>,
    /// Block type the curve was read from (the writer always emits `S`)
    pub curve_type: CurveType,
}

impl Polyline {
    /// Create an empty, visible, open curve
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            closed: false,
            visible: true,
            vertices_visible: false,
            is_2d: false,
            up_axis: UpAxis::default(),
            const_altitude: None,
            global_shift: None,
            curve_type: CurveType::default(),
        }
    }

    /// Create a curve from already-local vertices
    pub fn from_vertices(name: impl Into<String>, vertices: Vec<Point3<f64>>) -> Self {
        Self {
            vertices,
            ..Self::new(name)
        }
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn with_global_shift(mut self, shift: CoordinateShift) -> Self {
        self.global_shift = Some(shift);
        self
    }

    /// Mark the curve as lying in the plane orthogonal to `up_axis`
    pub fn with_2d_axis(mut self, up_axis: UpAxis) -> Self {
        self.is_2d = true;
        self.up_axis = up_axis;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Has enough vertices to be kept or written
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= MIN_VERTEX_COUNT
    }

    /// Convert a local vertex back to absolute coordinates
    #[inline]
    pub fn to_global(&self, local: &Point3<f64>) -> Point3<f64> {
        match &self.global_shift {
            Some(shift) => shift.to_global(local),
            None => *local,
        }
    }

    /// Vertices in absolute coordinates
    pub fn global_vertices(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.vertices.iter().map(move |p| self.to_global(p))
    }

    /// Lock the vertex storage; returns `false` when the curve must be discarded
    pub fn finalize(&mut self) -> bool {
        if !self.is_valid() {
            return false;
        }
        self.vertices.shrink_to_fit();
        true
    }

    /// Name with spaces replaced, as written to a `CN` line
    pub fn sinusx_name(&self) -> String {
        self.name.replace(' ', "_")
    }
}
