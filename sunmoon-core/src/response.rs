use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::frame::Frame;

/// Frames produced for one ref id.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DataResponse {
    pub frames: Vec<Frame>,
}

/// Ref id to frames, in the order ref ids first received a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    entries: Vec<(String, DataResponse)>,
}

impl Response {
    pub fn get(&self, ref_id: &str) -> Option<&DataResponse> {
        self.entries
            .iter()
            .find(|(id, _)| id == ref_id)
            .map(|(_, data)| data)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataResponse)> {
        self.entries.iter().map(|(id, data)| (id.as_str(), data))
    }

    pub fn ref_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, data) in &self.entries {
            map.serialize_entry(id, data)?;
        }
        map.end()
    }
}

/// Collects frames per ref id in append order. Repeated ref ids share one
/// entry; nothing is deduplicated.
#[derive(Debug, Default)]
pub struct ResponseAssembler {
    response: Response,
}

impl ResponseAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, ref_id: &str, frame: impl Into<Frame>) {
        let frame = frame.into();
        let entries = &mut self.response.entries;

        match entries.iter_mut().find(|(id, _)| id == ref_id) {
            Some((_, data)) => data.frames.push(frame),
            None => entries.push((
                ref_id.to_string(),
                DataResponse {
                    frames: vec![frame],
                },
            )),
        }
    }

    pub fn finish(self) -> Response {
        self.response
    }
}
