/// One timestamped checkpoint of an object's appearance.
///
/// `value` is the kind-specific payload (corners, control points, an integer, ...). It is
/// flattened next to `timestamp` when serialised.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyFrame<T> {
    /// Scene time in seconds.
    pub timestamp: f64,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub value: T,
}

impl<T> KeyFrame<T> {
    /// Build a keyframe.
    pub fn new(timestamp: f64, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// The pair of keyframes bracketing a query time, plus the interpolation factor.
#[derive(Debug)]
pub struct Span<'a, T> {
    /// Latest keyframe at or before the query time.
    pub start: &'a KeyFrame<T>,
    /// First keyframe strictly after the query time.
    pub end: &'a KeyFrame<T>,
    /// Index of `start` in the keyframe sequence.
    pub start_index: usize,
    /// `(t − start.timestamp) / (end.timestamp − start.timestamp)`, unclamped.
    pub factor: f64,
}

impl<T> Clone for Span<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Span<'_, T> {}

impl<'a, T> Span<'a, T> {
    /// Interpolation factor with anything at or past the end keyframe held at `1.0`.
    pub fn progress(&self) -> f64 {
        self.factor.min(1.0)
    }

    /// Start and end payloads.
    pub fn values(&self) -> (&'a T, &'a T) {
        (&self.start.value, &self.end.value)
    }
}

/// Locate the active span of `key_frames` at `timestamp`.
///
/// This is a linear scan from the front for the first keyframe whose timestamp exceeds
/// `timestamp`. The object is not visible (`None`) when there is no such keyframe or when it
/// is the first keyframe. Sequences are expected to be short and sorted ascending; unsorted
/// input is a caller contract violation.
pub fn locate<T>(key_frames: &[KeyFrame<T>], timestamp: f64) -> Option<Span<'_, T>> {
    locate_from(key_frames, timestamp, 0)
}

/// Same as [`locate`] but resumes the linear scan at `hint` when the keyframe there is not
/// after `timestamp`.
///
/// Every keyframe before `hint` is then also at or before `timestamp`, so the result is
/// identical to a scan from the front.
pub fn locate_from<T>(
    key_frames: &[KeyFrame<T>],
    timestamp: f64,
    hint: usize,
) -> Option<Span<'_, T>> {
    let first = match key_frames.get(hint) {
        Some(k) if k.timestamp <= timestamp => hint,
        _ => 0,
    };

    let end_index = first
        + key_frames[first..]
            .iter()
            .position(|k| k.timestamp > timestamp)?;
    if end_index == 0 {
        return None;
    }

    let start = &key_frames[end_index - 1];
    let end = &key_frames[end_index];
    let factor = (timestamp - start.timestamp) / (end.timestamp - start.timestamp);

    Some(Span {
        start,
        end,
        start_index: end_index - 1,
        factor,
    })
}

/// Per-object scan position kept between render calls.
///
/// Holds the index of the last start keyframe found so that playback moving forward does not
/// rescan from the front each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyFrameCursor {
    index: usize,
}

impl KeyFrameCursor {
    /// Locate the active span and remember where it was found.
    pub fn locate<'a, T>(
        &mut self,
        key_frames: &'a [KeyFrame<T>],
        timestamp: f64,
    ) -> Option<Span<'a, T>> {
        let span = locate_from(key_frames, timestamp, self.index)?;
        self.index = span.start_index;
        Some(span)
    }

    /// Index the next scan starts from.
    pub fn position(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframe.rs"]
mod tests;
