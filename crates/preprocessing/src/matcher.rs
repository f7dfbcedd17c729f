//! Spatial and temporal selection of profiles.

use std::path::Path;

use chrono::NaiveDate;
use ocean_common::{BoundingBox, DateWindow, LongitudeConvention};
use profile_parser::ProfileHeader;

use crate::catalog::MapCatalog;
use crate::error::RejectReason;

/// `min <= date <= max`.
pub fn in_period(date: NaiveDate, min: NaiveDate, max: NaiveDate) -> bool {
    date >= min && date <= max
}

/// Map file for exactly `date`, if the catalog has one.
pub fn find_map_file(date: NaiveDate, catalog: &MapCatalog) -> Option<&Path> {
    catalog.get(date)
}

/// The map files matched to an accepted profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedMaps<'a> {
    pub date: NaiveDate,
    pub ssh: &'a Path,
    pub sst: &'a Path,
}

/// Decides whether a profile enters the dataset, based on its header alone.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    region: BoundingBox,
    convention: LongitudeConvention,
    period: DateWindow,
    ssh: &'a MapCatalog,
    sst: &'a MapCatalog,
}

impl<'a> Matcher<'a> {
    /// `region` bounds are taken to be in `convention`.
    pub fn new(
        region: BoundingBox,
        convention: LongitudeConvention,
        period: DateWindow,
        ssh: &'a MapCatalog,
        sst: &'a MapCatalog,
    ) -> Self {
        Self {
            region,
            convention,
            period,
            ssh,
            sst,
        }
    }

    /// Whether a location lies in the region, edges included. The
    /// longitude may be in either convention.
    pub fn in_region(&self, lat: f64, lon: f64) -> bool {
        self.region.contains_normalized(lat, lon, self.convention)
    }

    /// Accept the profile, or name the first check it fails.
    ///
    /// Checks run in order: region, period, SSH map, SST map.
    pub fn match_header(&self, header: &ProfileHeader) -> Result<MatchedMaps<'a>, RejectReason> {
        if !self.in_region(header.latitude, header.longitude) {
            return Err(RejectReason::OutOfRegion);
        }

        let date = header.observation_date;
        if !in_period(date, self.period.min, self.period.max) {
            return Err(RejectReason::OutOfPeriod);
        }

        let ssh = find_map_file(date, self.ssh).ok_or(RejectReason::MissingSshMap)?;
        let sst = find_map_file(date, self.sst).ok_or(RejectReason::MissingSstMap)?;

        Ok(MatchedMaps { date, ssh, sst })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcdf_parser::MapKind;
    use std::path::PathBuf;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalogs() -> (MapCatalog, MapCatalog) {
        let mut ssh = MapCatalog::new(MapKind::Ssh, "ssh");
        let mut sst = MapCatalog::new(MapKind::Sst, "sst");
        ssh.insert(ymd(2020, 1, 15), PathBuf::from("ssh/ssh_20200115.nc"));
        ssh.insert(ymd(2020, 1, 16), PathBuf::from("ssh/ssh_20200116.nc"));
        sst.insert(ymd(2020, 1, 15), PathBuf::from("sst/sst_20200115.nc"));
        (ssh, sst)
    }

    fn header(date: NaiveDate, lat: f64, lon: f64) -> ProfileHeader {
        ProfileHeader {
            observation_date: date,
            latitude: lat,
            longitude: lon,
            layer_count: 3,
        }
    }

    fn window() -> DateWindow {
        DateWindow::new(ymd(2020, 1, 1), ymd(2020, 12, 31)).unwrap()
    }

    #[test]
    fn test_in_period_inclusive() {
        let (min, max) = (ymd(2020, 1, 1), ymd(2020, 1, 31));
        assert!(in_period(min, min, max));
        assert!(in_period(max, min, max));
        assert!(!in_period(ymd(2019, 12, 31), min, max));
        assert!(!in_period(ymd(2020, 2, 1), min, max));
    }

    #[test]
    fn test_accepts_reference_profile() {
        let (ssh, sst) = catalogs();
        let matcher = Matcher::new(
            BoundingBox::new(0.0, 60.0, 120.0, 180.0),
            LongitudeConvention::ZeroTo360,
            window(),
            &ssh,
            &sst,
        );

        let maps = matcher.match_header(&header(ymd(2020, 1, 15), 10.2, 140.7)).unwrap();
        assert_eq!(maps.date, ymd(2020, 1, 15));
        assert_eq!(maps.ssh, Path::new("ssh/ssh_20200115.nc"));
        assert_eq!(maps.sst, Path::new("sst/sst_20200115.nc"));
    }

    #[test]
    fn test_out_of_region() {
        let (ssh, sst) = catalogs();
        let matcher = Matcher::new(
            BoundingBox::new(-60.0, 30.0, 0.0, 100.0),
            LongitudeConvention::ZeroTo360,
            window(),
            &ssh,
            &sst,
        );
        assert_eq!(
            matcher.match_header(&header(ymd(2020, 1, 15), 10.2, 140.7)),
            Err(RejectReason::OutOfRegion)
        );
    }

    #[test]
    fn test_signed_longitude_normalized() {
        let (ssh, sst) = catalogs();
        let matcher = Matcher::new(
            BoundingBox::new(-30.0, 30.0, 340.0, 20.0),
            LongitudeConvention::ZeroTo360,
            window(),
            &ssh,
            &sst,
        );
        assert!(matcher.in_region(0.0, -10.0));
        assert!(matcher.in_region(0.0, 10.0));
        assert!(!matcher.in_region(0.0, 30.0));
    }

    #[test]
    fn test_rejection_order() {
        let (ssh, sst) = catalogs();
        let matcher = Matcher::new(
            BoundingBox::globe(LongitudeConvention::ZeroTo360),
            LongitudeConvention::ZeroTo360,
            window(),
            &ssh,
            &sst,
        );

        assert_eq!(
            matcher.match_header(&header(ymd(2019, 6, 1), 10.0, 10.0)),
            Err(RejectReason::OutOfPeriod)
        );
        assert_eq!(
            matcher.match_header(&header(ymd(2020, 1, 17), 10.0, 10.0)),
            Err(RejectReason::MissingSshMap)
        );
        assert_eq!(
            matcher.match_header(&header(ymd(2020, 1, 16), 10.0, 10.0)),
            Err(RejectReason::MissingSstMap)
        );
    }
}
