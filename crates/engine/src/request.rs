//! Document load requests.

use url::Url;

/// Content type attached to every POST body.
pub const POST_CONTENT_TYPE: &str = "application/json";

/// How the document is requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadMethod {
    /// Plain navigation.
    Get,
    /// Navigation carrying a request body.
    Post {
        body: Vec<u8>,
        content_type: String,
    },
}

/// Target URL plus request method, built once before orchestration starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    url: Url,
    method: LoadMethod,
}

impl LoadRequest {
    /// A GET request for `url`.
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: LoadMethod::Get,
        }
    }

    /// A POST request for `url` with a JSON body.
    pub fn post_json(url: Url, body: Vec<u8>) -> Self {
        Self {
            url,
            method: LoadMethod::Post {
                body,
                content_type: POST_CONTENT_TYPE.to_owned(),
            },
        }
    }

    /// The document URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request method and body.
    pub fn method(&self) -> &LoadMethod {
        &self.method
    }

    /// Whether the request carries a body.
    pub fn is_post(&self) -> bool {
        matches!(self.method, LoadMethod::Post { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_json_uses_fixed_content_type() {
        let url = Url::parse("http://localhost/render").unwrap();
        let request = LoadRequest::post_json(url, b"{\"id\":1}".to_vec());
        assert!(request.is_post());
        assert_eq!(
            request.method(),
            &LoadMethod::Post {
                body: b"{\"id\":1}".to_vec(),
                content_type: "application/json".to_owned(),
            }
        );
    }

    #[test]
    fn get_has_no_body() {
        let url = Url::parse("file:///tmp/doc.html").unwrap();
        let request = LoadRequest::get(url.clone());
        assert!(!request.is_post());
        assert_eq!(request.url(), &url);
    }
}
