use crate::error::ParseError;
use crate::types::OrchestrationRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedRequest {
    pub request: OrchestrationRequest,
    pub format: RequestFormat,
}

pub fn parse_request_str(input: &str, format: RequestFormat) -> Result<ParsedRequest, ParseError> {
    match format {
        RequestFormat::Json => Ok(ParsedRequest {
            request: serde_json::from_str(input)?,
            format,
        }),
        RequestFormat::Yaml => Ok(ParsedRequest {
            request: serde_yaml::from_str(input)?,
            format,
        }),
        RequestFormat::Auto => parse_request_auto(input),
    }
}

fn parse_request_auto(input: &str) -> Result<ParsedRequest, ParseError> {
    // JSON documents start with `{` after trimming; everything else is tried as YAML first.
    if input.trim_start().starts_with('{') {
        return match serde_json::from_str::<OrchestrationRequest>(input) {
            Ok(request) => Ok(ParsedRequest {
                request,
                format: RequestFormat::Json,
            }),
            Err(e) => match serde_yaml::from_str::<OrchestrationRequest>(input) {
                Ok(request) => Ok(ParsedRequest {
                    request,
                    format: RequestFormat::Yaml,
                }),
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    match serde_yaml::from_str::<OrchestrationRequest>(input) {
        Ok(request) => Ok(ParsedRequest {
            request,
            format: RequestFormat::Yaml,
        }),
        Err(e) => match serde_json::from_str::<OrchestrationRequest>(input) {
            Ok(request) => Ok(ParsedRequest {
                request,
                format: RequestFormat::Json,
            }),
            Err(_) => Err(ParseError::Yaml(e)),
        },
    }
}
