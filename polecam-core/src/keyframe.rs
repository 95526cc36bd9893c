/// Keyframe sampling: time-stamped control points with linear interpolation
use nalgebra::{Vector3, Vector4};

use crate::error::{Error, Result};

/// Values that can be linearly interpolated
pub trait Lerp: Copy {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

/// Interpolatable values with a distance, usable as path points
pub trait PathPoint: Lerp {
    fn distance(&self, other: &Self) -> f32;
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vector3<f32> {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vector4<f32> {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl PathPoint for f32 {
    fn distance(&self, other: &Self) -> f32 {
        (other - self).abs()
    }
}

impl PathPoint for Vector3<f32> {
    fn distance(&self, other: &Self) -> f32 {
        (other - self).norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Sorted keyframes sampled by binary search and linear interpolation
#[derive(Debug, Clone)]
pub struct KeyframeSampler<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T: Lerp> KeyframeSampler<T> {
    /// Build a sampler from keyframes whose times never decrease.
    pub fn new(keys: Vec<Keyframe<T>>) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::EmptyKeyframes);
        }
        if let Some(index) = keys
            .windows(2)
            .position(|pair| !(pair[0].time <= pair[1].time))
        {
            return Err(Error::UnorderedKeyframes { index: index + 1 });
        }
        Ok(Self { keys })
    }

    /// Build a sampler over normalized time `[0, 1]`.
    ///
    /// The first key is pinned to time 0 and the last to time 1. When
    /// `looping`, a copy of the first value is appended so the sequence wraps
    /// back to its start at time 1.
    pub fn timed(mut keys: Vec<Keyframe<T>>, looping: bool) -> Result<Self> {
        if looping {
            if let Some(first) = keys.first().copied() {
                keys.push(first);
            }
        }
        if let Some(first) = keys.first_mut() {
            first.time = 0.0;
        }
        if let Some(last) = keys.last_mut() {
            last.time = 1.0;
        }
        Self::new(keys)
    }

    /// Sample at `t`, clamped to the keyframe time range.
    pub fn sample(&self, t: f32) -> T {
        // Keys after the partition point have a time strictly greater than t.
        let index = self.keys.partition_point(|key| key.time <= t);
        if index == 0 {
            return self.keys[0].value;
        }
        if index == self.keys.len() {
            return self.keys[index - 1].value;
        }

        let before = &self.keys[index - 1];
        let after = &self.keys[index];
        let span = after.time - before.time;
        if span <= 0.0 {
            return after.value;
        }
        before.value.lerp(&after.value, (t - before.time) / span)
    }

    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<T: PathPoint> KeyframeSampler<T> {
    /// Build a path over normalized time that is traversed at constant speed.
    ///
    /// Each point's time is its cumulative distance along the path divided by
    /// the total length. A looping path returns to the first point at time 1.
    pub fn constant_velocity(points: &[T], looping: bool) -> Result<Self> {
        let Some(first) = points.first().copied() else {
            return Err(Error::EmptyKeyframes);
        };

        let mut path: Vec<T> = points.to_vec();
        if looping && points.len() > 1 {
            path.push(first);
        }

        let mut travelled = 0.0;
        let mut keys = Vec::with_capacity(path.len());
        keys.push(Keyframe::new(0.0, first));
        for pair in path.windows(2) {
            travelled += pair[0].distance(&pair[1]);
            keys.push(Keyframe::new(travelled, pair[1]));
        }

        if travelled > 0.0 {
            for key in &mut keys {
                key.time /= travelled;
            }
        } else {
            keys.truncate(1);
        }
        Self::new(keys)
    }
}
