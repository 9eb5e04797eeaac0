//! Evidence collection: typed file attachments and completeness rules
//!
//! Each claim type mandates a different set of attachment roles and
//! narrative minimums before submission is permitted. The completeness
//! functions here are consumed twice: by the stage navigator's exit
//! predicates, and again by the decision engine, which re-derives pass/fail
//! from the same facts rather than trusting a navigator flag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::DocumentId;

use crate::error::ClaimError;

/// Maximum accepted size per file
pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Minimum incident-description length (damage and theft narratives)
pub const MIN_INCIDENT_DESCRIPTION_CHARS: usize = 20;

/// Minimum recovery-efforts description length (theft only)
pub const MIN_RECOVERY_EFFORTS_CHARS: usize = 50;

/// Accepted file content types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileContentType {
    Jpeg,
    Png,
    Pdf,
}

impl FileContentType {
    /// The canonical MIME string
    pub fn mime(&self) -> &'static str {
        match self {
            FileContentType::Jpeg => "image/jpeg",
            FileContentType::Png => "image/png",
            FileContentType::Pdf => "application/pdf",
        }
    }

    /// True for image types
    pub fn is_image(&self) -> bool {
        matches!(self, FileContentType::Jpeg | FileContentType::Png)
    }
}

impl FromStr for FileContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(FileContentType::Jpeg),
            "image/png" => Ok(FileContentType::Png),
            "application/pdf" => Ok(FileContentType::Pdf),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for FileContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime())
    }
}

/// The role an attachment plays in the evidence set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceRole {
    /// Photo showing the defect (breakdown)
    DefectPhoto,
    /// Photo showing the damage (damage)
    DamagePhoto,
    /// Photo of the item itself (theft)
    ItemPhoto,
    /// Photo of the scene of the theft (theft)
    TheftScenePhoto,
    /// Receipt or other proof the claimant owns the device
    ProofOfOwnership,
    /// Police report document (theft, PDF only)
    PoliceReport,
    /// Optional supporting documentation
    SupportingDocument,
}

impl EvidenceRole {
    /// True when attachments in this role are photographs
    pub fn is_photo(&self) -> bool {
        matches!(
            self,
            EvidenceRole::DefectPhoto
                | EvidenceRole::DamagePhoto
                | EvidenceRole::ItemPhoto
                | EvidenceRole::TheftScenePhoto
        )
    }
}

impl fmt::Display for EvidenceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvidenceRole::DefectPhoto => "defect_photo",
            EvidenceRole::DamagePhoto => "damage_photo",
            EvidenceRole::ItemPhoto => "item_photo",
            EvidenceRole::TheftScenePhoto => "theft_scene_photo",
            EvidenceRole::ProofOfOwnership => "proof_of_ownership",
            EvidenceRole::PoliceReport => "police_report",
            EvidenceRole::SupportingDocument => "supporting_document",
        };
        write!(f, "{name}")
    }
}

/// A file attached to the claim draft
///
/// Bytes are held in memory for the duration of the session; upload to blob
/// storage happens only at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier
    pub id: DocumentId,
    /// Evidence role
    pub role: EvidenceRole,
    /// Original file name
    pub file_name: String,
    /// Content type
    pub content_type: FileContentType,
    /// File size in bytes
    pub size_bytes: u64,
    /// Raw file content
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Validates and creates an attachment for a role
    ///
    /// Violations reject the individual file; there is no partial
    /// acceptance.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::UnsupportedFileType`] for anything outside JPEG/PNG/PDF
    /// - [`ClaimError::PoliceReportMustBePdf`] for non-PDF police reports
    /// - [`ClaimError::FileTooLarge`] above [`MAX_FILE_BYTES`]
    pub fn new(
        role: EvidenceRole,
        file_name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, ClaimError> {
        let content_type =
            FileContentType::from_str(mime).map_err(|mime| ClaimError::UnsupportedFileType {
                role: role.to_string(),
                mime,
            })?;

        if role == EvidenceRole::PoliceReport && content_type != FileContentType::Pdf {
            return Err(ClaimError::PoliceReportMustBePdf);
        }

        let size_bytes = bytes.len() as u64;
        if size_bytes > MAX_FILE_BYTES {
            return Err(ClaimError::FileTooLarge {
                size: size_bytes,
                max: MAX_FILE_BYTES,
            });
        }

        Ok(Self {
            id: DocumentId::new_v7(),
            role,
            file_name: file_name.into(),
            content_type,
            size_bytes,
            bytes,
        })
    }
}

/// True when a narrative meets a minimum length after trimming
pub fn narrative_meets_minimum(text: Option<&str>, min_chars: usize) -> bool {
    text.map(|t| t.trim().chars().count() >= min_chars)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parsing() {
        assert_eq!(
            "image/jpeg".parse::<FileContentType>().unwrap(),
            FileContentType::Jpeg
        );
        assert_eq!(
            "IMAGE/PNG".parse::<FileContentType>().unwrap(),
            FileContentType::Png
        );
        assert!("image/gif".parse::<FileContentType>().is_err());
    }

    #[test]
    fn test_attachment_accepts_pdf_photo_roles() {
        // All roles accept JPEG/PNG/PDF except the police report.
        let attachment = Attachment::new(
            EvidenceRole::DefectPhoto,
            "defect.pdf",
            "application/pdf",
            vec![1, 2, 3],
        );
        assert!(attachment.is_ok());
    }

    #[test]
    fn test_police_report_must_be_pdf() {
        let rejected = Attachment::new(
            EvidenceRole::PoliceReport,
            "report.jpg",
            "image/jpeg",
            vec![1],
        );
        assert!(matches!(
            rejected,
            Err(ClaimError::PoliceReportMustBePdf)
        ));

        let accepted = Attachment::new(
            EvidenceRole::PoliceReport,
            "report.pdf",
            "application/pdf",
            vec![1],
        );
        assert!(accepted.is_ok());
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let bytes = vec![0u8; (MAX_FILE_BYTES + 1) as usize];
        let rejected = Attachment::new(EvidenceRole::DamagePhoto, "big.png", "image/png", bytes);
        assert!(matches!(rejected, Err(ClaimError::FileTooLarge { .. })));
    }

    #[test]
    fn test_file_at_limit_is_accepted() {
        let bytes = vec![0u8; MAX_FILE_BYTES as usize];
        let accepted = Attachment::new(EvidenceRole::DamagePhoto, "ok.png", "image/png", bytes);
        assert!(accepted.is_ok());
    }

    #[test]
    fn test_narrative_minimum_counts_chars_not_bytes() {
        assert!(narrative_meets_minimum(Some("ééééé"), 5));
        assert!(!narrative_meets_minimum(Some("    abc    "), 5));
        assert!(!narrative_meets_minimum(None, 1));
    }
}
