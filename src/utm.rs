use crate::LonLat;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_ECC_SQ: f64 = 0.006_694_379_990_14;
const SCALE_FACTOR: f64 = 0.9996;

/// Converts a projected UTM coordinate back to WGS84 degrees.
///
/// The surface network ships in one fixed UTM zone; this is the standard
/// inverse Transverse Mercator series, accurate to well under a meter at
/// taxiway scale. Stateless and pure.
pub fn utm_to_wgs84(easting: f64, northing: f64, zone: u8, northern: bool) -> LonLat {
    let ecc_prime_sq = WGS84_ECC_SQ / (1.0 - WGS84_ECC_SQ);

    let x = easting - 500_000.0;
    let y = if northern {
        northing
    } else {
        northing - 10_000_000.0
    };

    // Footpoint latitude from the meridional arc.
    let m = y / SCALE_FACTOR;
    let mu = m / (WGS84_A
        * (1.0 - WGS84_ECC_SQ / 4.0
            - 3.0 * WGS84_ECC_SQ.powi(2) / 64.0
            - 5.0 * WGS84_ECC_SQ.powi(3) / 256.0));
    let e1 = (1.0 - (1.0 - WGS84_ECC_SQ).sqrt()) / (1.0 + (1.0 - WGS84_ECC_SQ).sqrt());
    let fp = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_fp = fp.sin();
    let cos_fp = fp.cos();
    let tan_fp = fp.tan();

    let c1 = ecc_prime_sq * cos_fp.powi(2);
    let t1 = tan_fp.powi(2);
    let denom = (1.0 - WGS84_ECC_SQ * sin_fp.powi(2)).sqrt();
    let n1 = WGS84_A / denom;
    let r1 = WGS84_A * (1.0 - WGS84_ECC_SQ) / denom.powi(3);
    let d = x / (n1 * SCALE_FACTOR);

    let lat = fp
        - (n1 * tan_fp / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ecc_prime_sq)
                    * d.powi(4)
                    / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                    - 252.0 * ecc_prime_sq
                    - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let central_meridian = (f64::from(zone) - 1.0) * 6.0 - 180.0 + 3.0;
    let lon = central_meridian
        + ((d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2)
                + 8.0 * ecc_prime_sq
                + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_fp)
            .to_degrees();

    LonLat::new(lon, lat.to_degrees())
}
