use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::constants::DEFAULT_TAG_COLOR;
use crate::modules::tag::schema::TagEntity;

/// Accepts `#RRGGBB` only.
pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("color").with_message("Color must look like #RRGGBB".into()))
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateTagModel {
    #[validate(length(min = 1, max = 50, message = "Tag name must be 1 to 50 characters long"))]
    pub name: String,
    #[validate(custom(function = "validate_color"))]
    pub color: String,
}

impl CreateTagModel {
    pub fn new(name: &str, color: Option<&str>) -> Self {
        CreateTagModel {
            name: name.trim().to_string(),
            color: color
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_TAG_COLOR)
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagDraft {
    pub name: String,
    pub color: String,
}

impl From<&TagEntity> for TagDraft {
    fn from(tag: &TagEntity) -> Self {
        TagDraft { name: tag.name.clone(), color: tag.color.clone() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct UpdateTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Tag name must be 1 to 50 characters long"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

impl UpdateTag {
    pub fn diff(original: &TagDraft, edited: &TagDraft) -> Self {
        let name = edited.name.trim();
        let color = edited.color.trim();
        UpdateTag {
            name: (original.name != name).then(|| name.to_string()),
            color: (!original.color.eq_ignore_ascii_case(color)).then(|| color.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_format() {
        assert!(validate_color("#409EFF").is_ok());
        assert!(validate_color("#a1b2c3").is_ok());
        assert!(validate_color("409EFF").is_err());
        assert!(validate_color("#409EF").is_err());
        assert!(validate_color("#GGGGGG").is_err());
        assert!(validate_color("#409EFF0").is_err());
    }

    #[test]
    fn test_create_defaults_color() {
        let model = CreateTagModel::new(" sunset ", None);
        assert_eq!(model.name, "sunset");
        assert_eq!(model.color, "#409EFF");
        assert!(model.validate().is_ok());

        assert!(CreateTagModel::new("", Some("#000000")).validate().is_err());
        assert!(CreateTagModel::new("x", Some("red")).validate().is_err());
    }

    #[test]
    fn test_update_diff() {
        let original = TagDraft { name: "sunset".into(), color: "#409EFF".into() };
        let recased = TagDraft { color: "#409eff".into(), ..original.clone() };
        assert!(UpdateTag::diff(&original, &recased).is_empty());

        let renamed = TagDraft { name: "dawn".into(), ..original.clone() };
        let diff = UpdateTag::diff(&original, &renamed);
        assert_eq!(serde_json::to_value(&diff).unwrap(), json!({"name": "dawn"}));

        let edited = TagDraft { color: "blue".into(), ..original.clone() };
        let bad = UpdateTag::diff(&original, &edited);
        assert!(bad.validate().is_err());
    }
}
