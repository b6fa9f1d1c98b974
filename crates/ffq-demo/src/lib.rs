//! Demonstration payload and fixtures for exercising `ffq`'s public API.
//!
//! The core queue is generic over any `P: Copy + Send + Sync + 'static` and
//! does not prescribe a payload layout. `AqiReading` here is the
//! illustrative fixed-size record carried by the original air-quality
//! monitoring system this design is modeled on — fixed-width byte arrays
//! stand in for bounded text fields so the type stays `Copy` and
//! allocation-free, which is what makes it usable as `P` at all.

use std::fmt;

/// A single air-quality reading, as a fixed-size, `Copy` record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiReading {
    /// ISO-8601-ish timestamp, zero-padded, up to 33 bytes.
    pub timestamp: [u8; 33],
    /// City name, up to 64 bytes.
    pub city: [u8; 64],
    pub aqi: i32,
    /// Icon code, up to 32 bytes.
    pub icon: [u8; 32],
    pub wind_speed: f32,
    pub humidity: i32,
    pub valid: bool,
}

impl AqiReading {
    /// Builds a reading from plain Rust strings, truncating (never
    /// panicking) if a field exceeds its fixed width.
    #[must_use]
    pub fn new(timestamp: &str, city: &str, aqi: i32, icon: &str, wind_speed: f32, humidity: i32) -> Self {
        Self {
            timestamp: pack(timestamp),
            city: pack(city),
            aqi,
            icon: pack(icon),
            wind_speed,
            humidity,
            valid: true,
        }
    }

    /// A payload with `valid = false`, reserved for termination signaling at
    /// the embedding level; the core has no concept of this field.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            timestamp: [0; 33],
            city: [0; 64],
            aqi: -1,
            icon: [0; 32],
            wind_speed: 0.0,
            humidity: 0,
            valid: false,
        }
    }

    #[must_use]
    pub fn city_str(&self) -> &str {
        unpack(&self.city)
    }

    #[must_use]
    pub fn timestamp_str(&self) -> &str {
        unpack(&self.timestamp)
    }
}

impl fmt::Display for AqiReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} aqi={} wind={:.1} humidity={}",
            self.timestamp_str(),
            self.city_str(),
            self.aqi,
            self.wind_speed,
            self.humidity
        )
    }
}

fn pack<const N: usize>(s: &str) -> [u8; N] {
    let mut buf = [0u8; N];
    let bytes = s.as_bytes();
    let len = bytes.len().min(N);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

fn unpack<const N: usize>(buf: &[u8; N]) -> &str {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(N);
    std::str::from_utf8(&buf[..end]).unwrap_or("")
}
