// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting edit request types

use serde::{Deserialize, Serialize};

use crate::diffusion::{EditError, EditRequest, EditSettings};
use crate::imaging;
use crate::lighting::LightingAngle;

/// Request for a lighting edit via POST /v1/images/relight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelightRequest {
    /// Input image as base64 or a `data:` URL
    #[serde(default)]
    pub image: Option<String>,

    /// Horizontal light angle in degrees
    #[serde(default)]
    pub azimuth: f64,

    /// Vertical light angle in degrees
    #[serde(default)]
    pub elevation: f64,

    #[serde(flatten)]
    pub settings: EditSettings,
}

impl RelightRequest {
    /// Decode the image and build the service-level request.
    /// An absent or blank image stays `None` so the service reports it.
    pub fn into_edit_request(self) -> Result<EditRequest, EditError> {
        let image = match self.image.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(encoded) => Some(imaging::decode_image_input(encoded)?.0),
        };

        Ok(EditRequest {
            image,
            angle: LightingAngle::new(self.azimuth, self.elevation),
            settings: self.settings,
        })
    }
}
