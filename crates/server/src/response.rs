use serde::{Serialize, Serializer, ser::SerializeMap};
use services::ApiModel;

/// JSON envelope of every entity response: the entity under its own name
/// and/or an `error` string. Absent parts are left out, so an empty payload
/// renders as `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<T = ()> {
    entity: Option<(&'static str, T)>,
    error: Option<String>,
}

impl<T> Payload<T> {
    pub fn empty() -> Self {
        Self {
            entity: None,
            error: None,
        }
    }
}

impl<M: ApiModel> Payload<M> {
    pub fn model(model: M) -> Self {
        Self {
            entity: Some((M::NAME, model)),
            error: None,
        }
    }
}

impl Payload {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            entity: None,
            error: Some(message.into()),
        }
    }
}

impl<T: Serialize> Serialize for Payload<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = usize::from(self.entity.is_some()) + usize::from(self.error.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some((key, value)) = &self.entity {
            map.serialize_entry(key, value)?;
        }
        if let Some(error) = &self.error {
            map.serialize_entry("error", error)?;
        }
        map.end()
    }
}
