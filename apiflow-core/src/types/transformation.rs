use crate::types::AnyValue;

/// Mutation applied to a step before its call is issued.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestTransformation {
    pub r#type: RequestTransformationType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// May embed a `{{index.path}}` reference to an earlier result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AnyValue>,
}

impl RequestTransformation {
    pub fn new(r#type: RequestTransformationType, key: Option<&str>, value: impl Into<AnyValue>) -> Self {
        Self {
            r#type,
            key: key.map(String::from),
            value: Some(value.into()),
        }
    }
}

/// Unknown type names are kept so they can be reported and skipped at execution time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestTransformationType {
    AddHeader,
    ModifyUrl,
    AddQueryParam,
    ModifyBody,
    SetTimeout,
    Unknown(String),
}

impl RequestTransformationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AddHeader => "add_header",
            Self::ModifyUrl => "modify_url",
            Self::AddQueryParam => "add_query_param",
            Self::ModifyBody => "modify_body",
            Self::SetTimeout => "set_timeout",
            Self::Unknown(name) => name,
        }
    }

    pub fn requires_key(&self) -> bool {
        matches!(self, Self::AddHeader | Self::AddQueryParam | Self::ModifyBody)
    }
}

impl From<String> for RequestTransformationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "add_header" => Self::AddHeader,
            "modify_url" => Self::ModifyUrl,
            "add_query_param" => Self::AddQueryParam,
            "modify_body" => Self::ModifyBody,
            "set_timeout" => Self::SetTimeout,
            _ => Self::Unknown(s),
        }
    }
}

impl From<RequestTransformationType> for String {
    fn from(t: RequestTransformationType) -> Self {
        t.as_str().to_string()
    }
}

/// Mutation applied to a step's result after its call completed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResponseTransformation {
    pub r#type: ResponseTransformationType,

    #[serde(default, alias = "fieldPath", skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub filter: serde_json::Map<String, AnyValue>,

    #[serde(default, alias = "oldName", skip_serializing_if = "Option::is_none")]
    pub old_name: Option<String>,

    #[serde(default, alias = "newName", skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

impl ResponseTransformation {
    pub fn extract_field(field_path: &str, alias: Option<&str>) -> Self {
        Self {
            field_path: Some(field_path.to_string()),
            alias: alias.map(String::from),
            ..Self::empty(ResponseTransformationType::ExtractField)
        }
    }

    pub fn filter_data(filter: serde_json::Map<String, AnyValue>) -> Self {
        Self {
            filter,
            ..Self::empty(ResponseTransformationType::FilterData)
        }
    }

    pub fn rename_field(old_name: &str, new_name: &str) -> Self {
        Self {
            old_name: Some(old_name.to_string()),
            new_name: Some(new_name.to_string()),
            ..Self::empty(ResponseTransformationType::RenameField)
        }
    }

    fn empty(r#type: ResponseTransformationType) -> Self {
        Self {
            r#type,
            field_path: None,
            alias: None,
            filter: serde_json::Map::new(),
            old_name: None,
            new_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseTransformationType {
    ExtractField,
    FilterData,
    RenameField,
    Unknown(String),
}

impl ResponseTransformationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ExtractField => "extract_field",
            Self::FilterData => "filter_data",
            Self::RenameField => "rename_field",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for ResponseTransformationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "extract_field" => Self::ExtractField,
            "filter_data" => Self::FilterData,
            "rename_field" => Self::RenameField,
            _ => Self::Unknown(s),
        }
    }
}

impl From<ResponseTransformationType> for String {
    fn from(t: ResponseTransformationType) -> Self {
        t.as_str().to_string()
    }
}
