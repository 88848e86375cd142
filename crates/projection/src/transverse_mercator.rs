//! Transverse Mercator projection on the WGS84 ellipsoid.
//!
//! Uses the Krüger series to sixth order in the third flattening `n`, which
//! keeps errors in the nanometre range within a few thousand kilometres of
//! the central meridian.
//!
//! The projection parameters include:
//! - Central meridian (lon0) and latitude of origin (lat0)
//! - Scale factor on the central meridian (k0)
//! - False easting / northing

use std::f64::consts::PI;

/// WGS84 semi-major axis (meters).
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Scale factor on the central meridian used by UTM and local grids.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;

const MAX_ITERATIONS: usize = 10;

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercator {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    /// First eccentricity
    e: f64,
    /// k0 times the rectifying radius
    k0_a: f64,
    /// Forward series coefficients
    alpha: [f64; 6],
    /// Inverse series coefficients
    beta: [f64; 6],
    /// Northing of the latitude of origin before offsets
    m0: f64,
}

impl TransverseMercator {
    /// Create a projection on the WGS84 ellipsoid.
    ///
    /// # Arguments
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `lat0_deg` - Latitude of origin (degrees)
    /// * `k0` - Scale factor on the central meridian
    /// * `false_easting` - Added to every x (meters)
    /// * `false_northing` - Added to every y (meters)
    pub fn new(
        lon0_deg: f64,
        lat0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let to_rad = PI / 180.0;
        let f = WGS84_FLATTENING;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let rectifying_radius =
            WGS84_SEMI_MAJOR_AXIS / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1_983_433.0 * n6 / 1_935_360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167_603.0 * n6 / 181_440.0,
            49561.0 * n4 / 161_280.0 - 179.0 * n5 / 168.0 + 6_601_661.0 * n6 / 7_257_600.0,
            34729.0 * n5 / 80640.0 - 3_418_889.0 * n6 / 1_995_840.0,
            212_378_941.0 * n6 / 319_334_400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604_800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1_118_711.0 * n6 / 3_870_720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161_280.0 - 11.0 * n5 / 504.0 - 830_251.0 * n6 / 7_257_600.0,
            4583.0 * n5 / 161_280.0 - 108_847.0 * n6 / 3_991_680.0,
            20_648_693.0 * n6 / 638_668_800.0,
        ];

        let mut proj = Self {
            lon0: lon0_deg * to_rad,
            lat0: lat0_deg * to_rad,
            k0,
            false_easting,
            false_northing,
            e: (f * (2.0 - f)).sqrt(),
            k0_a: k0 * rectifying_radius,
            alpha,
            beta,
            m0: 0.0,
        };
        proj.m0 = proj.forward_raw(0.0, proj.lat0).1;
        proj
    }

    /// Local projection centered on a meridian: lat0 = 0, k0 = 0.9996, no
    /// false easting or northing.
    pub fn local(lon0_deg: f64) -> Self {
        Self::new(lon0_deg, 0.0, UTM_SCALE_FACTOR, 0.0, 0.0)
    }

    /// Convert geographic coordinates (degrees) to projected coordinates (meters).
    ///
    /// Returns (x, y).
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lam = normalize_radians(lon_deg * to_rad - self.lon0);
        let phi = lat_deg * to_rad;

        let (x, y) = self.forward_raw(lam, phi);
        (x + self.false_easting, y - self.m0 + self.false_northing)
    }

    /// Convert projected coordinates (meters) to geographic coordinates (degrees).
    ///
    /// Returns (lon, lat).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;

        let xi = (y - self.false_northing + self.m0) / self.k0_a;
        let eta = (x - self.false_easting) / self.k0_a;

        let mut xip = xi;
        let mut etap = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xip -= b * (k * xi).sin() * (k * eta).cosh();
            etap -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_etap = etap.sinh();
        let cos_xip = xip.cos();
        let tau_prime = xip.sin() / sinh_etap.hypot(cos_xip);
        let lam = sinh_etap.atan2(cos_xip);

        let phi = self.conformal_to_tangent(tau_prime).atan();
        let lon = normalize_radians(self.lon0 + lam);

        (lon * to_deg, phi * to_deg)
    }

    /// Projected coordinates relative to the central meridian, without any
    /// offsets applied.
    fn forward_raw(&self, lam: f64, phi: f64) -> (f64, f64) {
        let tau_prime = tangent_to_conformal(phi.tan(), self.e);
        let cos_lam = lam.cos();

        let xip = tau_prime.atan2(cos_lam);
        let etap = (lam.sin() / tau_prime.hypot(cos_lam)).asinh();

        let mut xi = xip;
        let mut eta = etap;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xip).sin() * (k * etap).cosh();
            eta += a * (k * xip).cos() * (k * etap).sinh();
        }

        (self.k0_a * eta, self.k0_a * xi)
    }

    /// Newton iteration inverting `tangent_to_conformal`.
    fn conformal_to_tangent(&self, tau_prime: f64) -> f64 {
        let e2m = 1.0 - self.e * self.e;
        let mut tau = tau_prime;

        for _ in 0..MAX_ITERATIONS {
            let tau_prime_i = tangent_to_conformal(tau, self.e);
            let dtau = (tau_prime - tau_prime_i) * (1.0 + e2m * tau * tau)
                / (e2m * (1.0 + tau * tau).sqrt() * (1.0 + tau_prime_i * tau_prime_i).sqrt());
            tau += dtau;
            if !(dtau.abs() >= 1e-15 * tau.abs().max(1.0)) {
                break;
            }
        }

        tau
    }
}

/// Tangent of the conformal latitude from the tangent of the geodetic one.
fn tangent_to_conformal(tau: f64, e: f64) -> f64 {
    let tau1 = (1.0 + tau * tau).sqrt();
    let sig = (e * (e * tau / tau1).atanh()).sinh();
    tau * (1.0 + sig * sig).sqrt() - sig * tau1
}

/// Normalize an angle to [-π, π].
fn normalize_radians(angle: f64) -> f64 {
    if (-PI..=PI).contains(&angle) {
        angle
    } else {
        (angle + PI).rem_euclid(2.0 * PI) - PI
    }
}
