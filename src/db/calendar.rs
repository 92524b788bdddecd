//! Single source of "today" for every storage operation.

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, SubsecRound, Utc,
};
use chrono_tz::Tz;
use std::fmt;
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used to cross day boundaries in tests.
pub struct ManualClock {
    instant: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut instant = self.instant.lock().unwrap_or_else(|e| e.into_inner());
        *instant += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Zone the calendar day is computed in. The offset is resolved per instant,
/// so daylight-saving changes move the boundary without a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The host's zone, as `chrono::Local` sees it at each instant.
    Local,
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    fn wall_clock(self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Local => instant.with_timezone(&Local).naive_local(),
            Zone::Fixed(offset) => instant.with_timezone(&offset).naive_local(),
            Zone::Named(tz) => instant.with_timezone(&tz).naive_local(),
        }
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Zone::Fixed(offset)
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Zone::Named(tz)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// Calendar day an instant falls on in the given zone.
pub fn calendar_day(instant: DateTime<Utc>, zone: Zone) -> NaiveDate {
    wall_clock(instant, zone).date()
}

/// Wall-clock time in the given zone, truncated to the microsecond precision
/// the `fecha` column keeps.
pub fn wall_clock(instant: DateTime<Utc>, zone: Zone) -> NaiveDateTime {
    zone.wall_clock(instant.trunc_subsecs(6))
}

#[derive(Clone)]
pub struct Calendar {
    zone: Zone,
    clock: Arc<dyn Clock>,
}

/// One clock reading: the UTC instant persisted in `fecha`, its wall-clock
/// rendering and the day it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub utc: NaiveDateTime,
    pub fecha: NaiveDateTime,
    pub dia: NaiveDate,
}

impl Calendar {
    pub fn new(zone: impl Into<Zone>, clock: Arc<dyn Clock>) -> Self {
        Self {
            zone: zone.into(),
            clock,
        }
    }

    pub fn system(zone: Zone) -> Self {
        Self::new(zone, Arc::new(SystemClock))
    }

    pub fn today(&self) -> NaiveDate {
        calendar_day(self.clock.now(), self.zone)
    }

    pub fn stamp(&self) -> Stamp {
        let instant = self.clock.now().trunc_subsecs(6);
        Stamp {
            utc: instant.naive_utc(),
            fecha: wall_clock(instant, self.zone),
            dia: calendar_day(instant, self.zone),
        }
    }

    /// Renders a stored UTC `fecha` as wall-clock time in this zone.
    pub fn localize(&self, utc: NaiveDateTime) -> NaiveDateTime {
        wall_clock(utc.and_utc(), self.zone)
    }
}
