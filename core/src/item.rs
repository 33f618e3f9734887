//! Listing types and moderation transitions.

use crate::error::{Error, Result};
use crate::{ItemId, UserId};
use serde::{Deserialize, Serialize};

/// Garment category of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Accessories,
}

impl Category {
    /// Wire/storage name for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "Tops",
            Category::Bottoms => "Bottoms",
            Category::Dresses => "Dresses",
            Category::Outerwear => "Outerwear",
            Category::Accessories => "Accessories",
        }
    }

    /// Parse a storage name back into a category.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Tops" => Some(Category::Tops),
            "Bottoms" => Some(Category::Bottoms),
            "Dresses" => Some(Category::Dresses),
            "Outerwear" => Some(Category::Outerwear),
            "Accessories" => Some(Category::Accessories),
            _ => None,
        }
    }
}

/// Style classification of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GarmentType {
    Casual,
    Formal,
    Sportswear,
    Vintage,
    Designer,
    #[serde(rename = "School Dresses")]
    SchoolDresses,
}

impl GarmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentType::Casual => "Casual",
            GarmentType::Formal => "Formal",
            GarmentType::Sportswear => "Sportswear",
            GarmentType::Vintage => "Vintage",
            GarmentType::Designer => "Designer",
            GarmentType::SchoolDresses => "School Dresses",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Casual" => Some(GarmentType::Casual),
            "Formal" => Some(GarmentType::Formal),
            "Sportswear" => Some(GarmentType::Sportswear),
            "Vintage" => Some(GarmentType::Vintage),
            "Designer" => Some(GarmentType::Designer),
            "School Dresses" => Some(GarmentType::SchoolDresses),
            _ => None,
        }
    }
}

/// Physical condition of a garment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like-new",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Condition::New),
            "like-new" => Some(Condition::LikeNew),
            "good" => Some(Condition::Good),
            "fair" => Some(Condition::Fair),
            "poor" => Some(Condition::Poor),
            _ => None,
        }
    }
}

/// Admin-controlled visibility gate on a listing.
///
/// Distinct from swap status: this gates whether the listing appears in
/// public queries at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ModerationStatus::Pending),
            "approved" => Some(ModerationStatus::Approved),
            "rejected" => Some(ModerationStatus::Rejected),
            _ => None,
        }
    }

    /// Apply an admin decision. Only `pending` listings can be reviewed.
    pub fn review(self, decision: ModerationDecision) -> Result<ModerationStatus> {
        if self != ModerationStatus::Pending {
            return Err(Error::NotPendingModeration);
        }
        Ok(match decision {
            ModerationDecision::Approve => ModerationStatus::Approved,
            ModerationDecision::Reject => ModerationStatus::Rejected,
        })
    }
}

/// An admin's verdict on a pending listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationDecision {
    Approve,
    Reject,
}

/// The slice of a listing the domain rules care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub id: ItemId,
    pub owner_id: UserId,
    pub status: ModerationStatus,
    pub is_available: bool,
}

impl Listing {
    /// Whether the listing may appear in public queries and receive swap
    /// requests.
    pub fn is_publicly_visible(&self) -> bool {
        self.status == ModerationStatus::Approved && self.is_available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn listing(status: ModerationStatus, available: bool) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            status,
            is_available: available,
        }
    }

    #[test]
    fn visibility_requires_approved_and_available() {
        assert!(listing(ModerationStatus::Approved, true).is_publicly_visible());
        assert!(!listing(ModerationStatus::Approved, false).is_publicly_visible());
        assert!(!listing(ModerationStatus::Pending, true).is_publicly_visible());
        assert!(!listing(ModerationStatus::Rejected, true).is_publicly_visible());
    }

    #[test]
    fn review_only_from_pending() {
        assert_eq!(
            ModerationStatus::Pending.review(ModerationDecision::Approve),
            Ok(ModerationStatus::Approved)
        );
        assert_eq!(
            ModerationStatus::Pending.review(ModerationDecision::Reject),
            Ok(ModerationStatus::Rejected)
        );
        assert_eq!(
            ModerationStatus::Approved.review(ModerationDecision::Reject),
            Err(Error::NotPendingModeration)
        );
        assert_eq!(
            ModerationStatus::Rejected.review(ModerationDecision::Approve),
            Err(Error::NotPendingModeration)
        );
    }

    #[test]
    fn wire_names_round_trip() {
        for c in [
            Condition::New,
            Condition::LikeNew,
            Condition::Good,
            Condition::Fair,
            Condition::Poor,
        ] {
            assert_eq!(Condition::parse(c.as_str()), Some(c));
        }
        assert_eq!(
            GarmentType::parse("School Dresses"),
            Some(GarmentType::SchoolDresses)
        );
        assert_eq!(
            serde_json::to_string(&Condition::LikeNew).unwrap(),
            "\"like-new\""
        );
        assert_eq!(
            serde_json::to_string(&GarmentType::SchoolDresses).unwrap(),
            "\"School Dresses\""
        );
        assert_eq!(Category::parse("Hats"), None);
    }
}
