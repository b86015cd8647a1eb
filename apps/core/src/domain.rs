use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Pendidikan")]
    Education,
    #[serde(rename = "Kesehatan")]
    Health,
    #[serde(rename = "Teknologi")]
    Technology,
    #[serde(rename = "Lingkungan")]
    Environment,
    #[serde(rename = "Ekonomi Kreatif")]
    CreativeEconomy,
    #[serde(rename = "Pariwisata")]
    Tourism,
    #[serde(rename = "Pemberdayaan Masyarakat")]
    CommunityEmpowerment,
    #[serde(rename = "Infrastruktur")]
    Infrastructure,
    #[serde(rename = "Pertanian")]
    Agriculture,
    #[serde(rename = "Kelautan")]
    Marine,
}

impl Category {
    pub const ALL: [Self; 10] = [
        Self::Education,
        Self::Health,
        Self::Technology,
        Self::Environment,
        Self::CreativeEconomy,
        Self::Tourism,
        Self::CommunityEmpowerment,
        Self::Infrastructure,
        Self::Agriculture,
        Self::Marine,
    ];

    /// Display name as published in the dataset.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Education => "Pendidikan",
            Self::Health => "Kesehatan",
            Self::Technology => "Teknologi",
            Self::Environment => "Lingkungan",
            Self::CreativeEconomy => "Ekonomi Kreatif",
            Self::Tourism => "Pariwisata",
            Self::CommunityEmpowerment => "Pemberdayaan Masyarakat",
            Self::Infrastructure => "Infrastruktur",
            Self::Agriculture => "Pertanian",
            Self::Marine => "Kelautan",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Accepts either the published name or the English label, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|category| {
            category.as_str().to_lowercase() == needle || category.label().to_lowercase() == needle
        })
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Health => "Health",
            Self::Technology => "Technology",
            Self::Environment => "Environment",
            Self::CreativeEconomy => "Creative Economy",
            Self::Tourism => "Tourism",
            Self::CommunityEmpowerment => "Community Empowerment",
            Self::Infrastructure => "Infrastructure",
            Self::Agriculture => "Agriculture",
            Self::Marine => "Marine",
        }
    }

    /// Marker colour as RGB.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Education => (0x3B, 0x82, 0xF6),
            Self::Health => (0xEF, 0x44, 0x44),
            Self::Technology => (0x8B, 0x5C, 0xF6),
            Self::Environment => (0x10, 0xB9, 0x81),
            Self::CreativeEconomy => (0xF5, 0x9E, 0x0B),
            Self::Tourism => (0x14, 0xB8, 0xA6),
            Self::CommunityEmpowerment => (0xEC, 0x48, 0x99),
            Self::Infrastructure => (0x63, 0x66, 0xF1),
            Self::Agriculture => (0x84, 0xCC, 0x16),
            Self::Marine => (0x06, 0xB6, 0xD4),
        }
    }

    /// Single-cell marker glyph.
    pub const fn glyph(self) -> char {
        match self {
            Self::Education => 'E',
            Self::Health => '+',
            Self::Technology => 'T',
            Self::Environment => '*',
            Self::CreativeEconomy => '&',
            Self::Tourism => 'P',
            Self::CommunityEmpowerment => 'U',
            Self::Infrastructure => '#',
            Self::Agriculture => 'A',
            Self::Marine => '~',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::Planned, Self::InProgress, Self::Completed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Planned),
            1 => Some(Self::InProgress),
            2 => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "planned" => Some(Self::Planned),
            "in progress" | "inprogress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Planned => (0x6B, 0x72, 0x80),
            Self::InProgress => (0x3B, 0x82, 0xF6),
            Self::Completed => (0x22, 0xC5, 0x5E),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_accepts_published_and_english_names() {
        assert_eq!(Category::parse("kelautan"), Some(Category::Marine));
        assert_eq!(Category::parse("  Ekonomi Kreatif "), Some(Category::CreativeEconomy));
        assert_eq!(Category::parse("creative economy"), Some(Category::CreativeEconomy));
        assert_eq!(Category::parse("Museums"), None);
    }

    #[test]
    fn from_index_follows_declaration_order() {
        for (index, category) in Category::ALL.into_iter().enumerate() {
            assert_eq!(Category::from_index(index), Some(category));
        }
        assert_eq!(Category::from_index(10), None);
    }

    #[test]
    fn status_serializes_with_published_spelling() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&Status::InProgress)?, "\"In Progress\"");
        let status: Status = serde_json::from_str("\"Completed\"")?;
        assert_eq!(status, Status::Completed);
        assert_eq!(Status::parse("in-progress"), Some(Status::InProgress));
        Ok(())
    }
}
