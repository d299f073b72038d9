// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Screen layouts and their geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RadarError;
use crate::projection::ScreenPoint;
use crate::surface::Rect;

/// Smallest table height worth showing under a full-width scope.
const MIN_COMPACT_TABLE_PX: i32 = 40;

/// Which panels are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStyle {
    /// Full-width scope with a compact table underneath.
    MaxScope,
    /// Scope on the upper half, table with footer on the lower half.
    #[default]
    SplitScreen,
    /// Full-screen table with footer.
    TableOnly,
}

impl LayoutStyle {
    pub const ALL: [Self; 3] = [Self::MaxScope, Self::SplitScreen, Self::TableOnly];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::MaxScope => 0,
            Self::SplitScreen => 1,
            Self::TableOnly => 2,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, RadarError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| RadarError::UnknownLayoutStyle(index.to_string()))
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MaxScope => "max_scope",
            Self::SplitScreen => "split_screen",
            Self::TableOnly => "table_only",
        }
    }

    /// Panel placement on a `width` x `height` portrait screen.
    #[must_use]
    pub fn geometry(self, width: i32, height: i32) -> Geometry {
        match self {
            Self::MaxScope => {
                let table_height = height - width;
                Geometry {
                    scope: Some(ScopeGeometry {
                        center: ScreenPoint::new(width / 2, width / 2),
                        radius: width / 2 - 4,
                    }),
                    table: (table_height >= MIN_COMPACT_TABLE_PX).then(|| TableGeometry {
                        rect: Rect::new(4, width, width - 4, table_height),
                        compact: true,
                    }),
                }
            }
            Self::SplitScreen => Geometry {
                scope: Some(ScopeGeometry {
                    center: ScreenPoint::new(width / 2, height / 4),
                    radius: height / 4 - 10,
                }),
                table: Some(TableGeometry {
                    rect: Rect::new(4, height / 2 + 10, width - 4, height / 2 - 10),
                    compact: false,
                }),
            },
            Self::TableOnly => Geometry {
                scope: None,
                table: Some(TableGeometry {
                    rect: Rect::new(0, 0, width, height),
                    compact: false,
                }),
            },
        }
    }
}

impl fmt::Display for LayoutStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutStyle {
    type Err = RadarError;

    /// Accepts a style name (`max_scope`, `split-screen`, `TableOnly`, ...)
    /// or its index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.trim().parse::<usize>() {
            return Self::from_index(index);
        }
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "maxscope" => Ok(Self::MaxScope),
            "splitscreen" | "split" => Ok(Self::SplitScreen),
            "tableonly" | "table" => Ok(Self::TableOnly),
            _ => Err(RadarError::UnknownLayoutStyle(s.to_string())),
        }
    }
}

/// Scope disk placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeGeometry {
    pub center: ScreenPoint,
    pub radius: i32,
}

/// Table panel placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableGeometry {
    pub rect: Rect,
    /// Compact tables have no status footer.
    pub compact: bool,
}

/// Panels present in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub scope: Option<ScopeGeometry>,
    pub table: Option<TableGeometry>,
}
