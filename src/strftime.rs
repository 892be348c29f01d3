// std imports
use std::fmt::{self, Write as _};
use std::sync::Arc;

// third-party imports
use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike};
use once_cell::sync::Lazy;

// local imports
use crate::pool::{Lease, SQPool};
use crate::timezone::ZoneName;

// ---

type BufPool = SQPool<String, fn() -> String, fn(String) -> String>;

static BUF_POOL: Lazy<Arc<BufPool>> = Lazy::new(|| {
    Arc::new(
        SQPool::new_with_factory((|| String::with_capacity(64)) as fn() -> String).with_recycler(
            (|mut buf: String| {
                buf.clear();
                buf
            }) as fn(String) -> String,
        ),
    )
});

// ---

/// Scanner position within a `%`-escape sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ParseState {
    #[default]
    Init,
    Percent,
    Width,
    Dot,
    Precision,
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "Init",
            Self::Percent => "Percent",
            Self::Width => "Width",
            Self::Dot => "Dot",
            Self::Precision => "Precision",
        })
    }
}

// ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Justify {
    Left,
    #[default]
    Right,
}

/// Formatting flags accumulated while scanning one escape sequence.
///
/// The flags live for exactly one specifier occurrence: they are empty when
/// an escape begins and are reset right after the specifier is rendered,
/// on the diagnostic path as well.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct FormatFlags {
    pad: Option<char>,
    width: Option<usize>,
    precision: Option<usize>,
    justify: Justify,
}

impl FormatFlags {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_default_pad(&mut self, pad: char) {
        if self.pad.is_none() {
            self.pad = Some(pad);
        }
    }

    fn set_default_width(&mut self, width: usize) {
        if self.width.is_none() {
            self.width = Some(width);
        }
    }

    /// Renders `value` truncated to the precision and padded to the width.
    ///
    /// The default pad is a space; a `+` pad makes no sense for text and is
    /// demoted to `0`, and a zero pad is in turn demoted to a space when the
    /// field is left-justified.
    fn format_str(mut self, buf: &mut String, value: &str) {
        self.set_default_pad(' ');
        let mut pad = self.pad.unwrap_or(' ');
        if pad == '+' {
            pad = '0';
        }
        if self.justify == Justify::Left && pad == '0' {
            pad = ' ';
        }

        let value = match self.precision {
            Some(p) => truncate_chars(value, p),
            None => value,
        };

        let n = value.chars().count();
        if let Some(width) = self.width {
            if self.justify == Justify::Right {
                for _ in n..width {
                    buf.push(pad);
                }
            }
            buf.push_str(value);
            if self.justify == Justify::Left {
                for _ in n..width {
                    buf.push(pad);
                }
            }
        } else {
            buf.push_str(value);
        }
    }

    fn format_int(self, buf: &mut String, value: i64) {
        self.render_int(buf, value < 0, value.unsigned_abs());
    }

    fn format_uint(self, buf: &mut String, value: u64) {
        self.render_int(buf, false, value);
    }

    /// Renders a base-10 magnitude with an optional sign.
    ///
    /// The default pad is zero. A `+` pad always emits a sign character and
    /// pads with zeros; a negative value emits `-` regardless of the pad
    /// mode. Zero padding is demoted to spaces when left-justified. The sign
    /// counts towards the width and is written before any left padding.
    fn render_int(mut self, buf: &mut String, negative: bool, value: u64) {
        self.set_default_pad('0');
        let mut pad = self.pad.unwrap_or('0');

        let mut sign = "";
        if pad == '+' {
            sign = "+";
            pad = '0';
        }
        if pad == '0' && self.justify == Justify::Left {
            pad = ' ';
        }
        if negative {
            sign = "-";
        }

        let mut digits = itoa::Buffer::new();
        let digits = digits.format(value);
        let n = digits.len() + sign.len();

        buf.push_str(sign);
        if let Some(width) = self.width {
            if self.justify == Justify::Right {
                for _ in n..width {
                    buf.push(pad);
                }
            }
            buf.push_str(digits);
            if self.justify == Justify::Left {
                for _ in n..width {
                    buf.push(pad);
                }
            }
        } else {
            buf.push_str(digits);
        }
    }
}

impl fmt::Display for FormatFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{pad: ")?;
        match self.pad {
            Some(pad) => write!(f, "{pad:?}")?,
            None => f.write_str("-")?,
        }
        f.write_str(", width: ")?;
        match self.width {
            Some(width) => write!(f, "{width}")?,
            None => f.write_str("-")?,
        }
        f.write_str(", precision: ")?;
        match self.precision {
            Some(precision) => write!(f, "{precision}")?,
            None => f.write_str("-")?,
        }
        match self.justify {
            Justify::Left => f.write_str(", justify: left}"),
            Justify::Right => f.write_str(", justify: right}"),
        }
    }
}

fn truncate_chars(value: &str, n: usize) -> &str {
    match value.char_indices().nth(n) {
        Some((pos, _)) => &value[..pos],
        None => value,
    }
}

// ---

/// Expands a strftime-style pattern for the given point in time.
///
/// The call is total: a malformed escape sequence does not fail the whole
/// expansion, it is replaced with an inline `%!ERR[..]` token carrying the
/// scanner state, the accumulated flags and the offending character, and the
/// scan resumes. Patterns are operator-supplied configuration, so a visibly
/// broken output beats no output at all.
pub fn strftime<Tz>(pattern: &str, t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: ZoneName,
{
    let mut buf = BUF_POOL.lease();
    scan(&mut buf, pattern, t);
    buf.clone()
}

/// Expands a file name pattern, i.e. [`strftime`] under its path-oriented name.
pub fn expand_path<Tz>(pattern: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: ZoneName,
{
    strftime(pattern, now)
}

fn scan<Tz>(buf: &mut String, pattern: &str, t: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: ZoneName,
{
    use ParseState::*;

    let mut state = ParseState::default();
    let mut flags = FormatFlags::default();

    for ch in pattern.chars() {
        match (state, ch) {
            (Init, '%') => {
                state = Percent;
            }
            (Init, _) => {
                buf.push(ch);
            }

            (Percent, '0') => flags.pad = Some('0'),
            (Percent, '+') => flags.pad = Some('+'),
            (Percent, '_') => flags.pad = Some('_'),
            (Percent, '-' | '<') => flags.justify = Justify::Left,
            (Percent, '>') => flags.justify = Justify::Right,
            (Percent, '1'..='9') => {
                // a leading '0' is the zero-pad flag, never a width digit
                flags.width = Some(digit(ch));
                state = Width;
            }
            (Percent, '.') => {
                state = Dot;
            }

            (Width, '0'..='9') => {
                flags.width = Some(flags.width.unwrap_or(0) * 10 + digit(ch));
            }
            (Width, '.') => {
                state = Dot;
            }

            (Dot, '0'..='9') => {
                flags.precision = Some(digit(ch));
                state = Precision;
            }
            (Dot, _) => {
                // even a valid specifier letter is malformed right after '.'
                fail(buf, state, &flags, ch);
                flags.reset();
                state = Init;
            }

            (Precision, '0'..='9') => {
                flags.precision = Some(flags.precision.unwrap_or(0) * 10 + digit(ch));
            }

            // Percent, Width and Precision all fall through to the same
            // specifier dispatch once a specifier letter shows up.
            _ => {
                if !dispatch(buf, flags, ch, t) {
                    fail(buf, state, &flags, ch);
                }
                flags.reset();
                state = Init;
            }
        }
    }
}

fn digit(ch: char) -> usize {
    (ch as u8 - b'0') as usize
}

fn fail(buf: &mut String, state: ParseState, flags: &FormatFlags, ch: char) {
    // writing to a String cannot fail
    let _ = write!(buf, "%!ERR[{state}, {flags}, {ch:?}]");
}

/// Renders one specifier, returning `false` for letters without a handler.
///
/// Week-oriented and day-of-year specifiers (`E G j u w g O U V W`) are
/// deliberately unimplemented and take the diagnostic path instead of
/// silently emitting nothing.
fn dispatch<Tz>(buf: &mut String, mut flags: FormatFlags, spec: char, t: &DateTime<Tz>) -> bool
where
    Tz: TimeZone,
    Tz::Offset: ZoneName,
{
    match spec {
        'A' => flags.format_str(buf, weekday_long(t)),
        'a' => flags.format_str(buf, weekday_short(t)),
        'B' => flags.format_str(buf, month_long(t)),
        'b' | 'h' => flags.format_str(buf, month_short(t)),
        'C' => {
            flags.set_default_width(2);
            flags.format_uint(buf, year(t) / 100);
        }
        'Y' => {
            flags.set_default_width(4);
            flags.format_uint(buf, year(t));
        }
        'y' => {
            flags.set_default_width(2);
            flags.format_uint(buf, year(t) % 100);
        }
        'm' => {
            flags.set_default_width(2);
            flags.format_uint(buf, t.month().into());
        }
        'd' => {
            flags.set_default_width(2);
            flags.format_uint(buf, t.day().into());
        }
        'e' => {
            flags.set_default_pad(' ');
            flags.set_default_width(2);
            flags.format_uint(buf, t.day().into());
        }
        'H' => {
            flags.set_default_width(2);
            flags.format_uint(buf, t.hour().into());
        }
        'k' => {
            flags.set_default_pad(' ');
            flags.set_default_width(2);
            flags.format_uint(buf, t.hour().into());
        }
        'I' => {
            flags.set_default_width(2);
            flags.format_uint(buf, t.hour12().1.into());
        }
        'l' => {
            flags.set_default_pad(' ');
            flags.set_default_width(2);
            flags.format_uint(buf, t.hour12().1.into());
        }
        'M' => {
            flags.set_default_width(2);
            flags.format_uint(buf, t.minute().into());
        }
        'S' => {
            flags.set_default_width(2);
            flags.format_uint(buf, t.second().into());
        }
        'p' => flags.format_str(buf, am_pm(t, true)),
        'P' => flags.format_str(buf, am_pm(t, false)),
        'z' => {
            flags.set_default_width(5);
            flags.format_int(buf, offset_hhmm(t));
        }
        'Z' => match t.offset().zone_name() {
            Some(name) => flags.format_str(buf, name),
            None => flags.format_str(buf, &rfc822_offset(t)),
        },
        'D' => {
            let s = format!("{:02}/{:02}/{:02}", t.month(), t.day(), year(t) % 100);
            flags.format_str(buf, &s);
        }
        'F' | 'x' => {
            let s = format!("{:04}-{:02}-{:02}", year(t), t.month(), t.day());
            flags.format_str(buf, &s);
        }
        'T' | 'X' => {
            let s = format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second());
            flags.format_str(buf, &s);
        }
        'R' => {
            let s = format!("{:02}:{:02}", t.hour(), t.minute());
            flags.format_str(buf, &s);
        }
        'r' => {
            let s = format!(
                "{:02}:{:02}:{:02} {}",
                t.hour12().1,
                t.minute(),
                t.second(),
                am_pm(t, true)
            );
            flags.format_str(buf, &s);
        }
        'c' => {
            let s = format!(
                "{} {} {:2} {:02}:{:02}:{:02} {}",
                weekday_short(t),
                month_short(t),
                t.day(),
                t.hour(),
                t.minute(),
                t.second(),
                year(t)
            );
            flags.format_str(buf, &s);
        }
        's' => {
            flags.format_uint(buf, t.timestamp() as u64);
        }
        'n' => flags.format_str(buf, "\n"),
        't' => flags.format_str(buf, "\t"),
        '%' => flags.format_str(buf, "%"),
        _ => return false,
    }
    true
}

// ---

fn year<Tz>(t: &DateTime<Tz>) -> u64
where
    Tz: TimeZone,
{
    u64::from(t.year().unsigned_abs())
}

fn weekday_long<Tz>(t: &DateTime<Tz>) -> &'static str
where
    Tz: TimeZone,
{
    WEEKDAYS_LONG[t.weekday().num_days_from_monday() as usize]
}

fn weekday_short<Tz>(t: &DateTime<Tz>) -> &'static str
where
    Tz: TimeZone,
{
    WEEKDAYS_SHORT[t.weekday().num_days_from_monday() as usize]
}

fn month_long<Tz>(t: &DateTime<Tz>) -> &'static str
where
    Tz: TimeZone,
{
    MONTHS_LONG[t.month0() as usize]
}

fn month_short<Tz>(t: &DateTime<Tz>) -> &'static str
where
    Tz: TimeZone,
{
    MONTHS_SHORT[t.month0() as usize]
}

fn am_pm<Tz>(t: &DateTime<Tz>, upper: bool) -> &'static str
where
    Tz: TimeZone,
{
    let am_pm = if upper { AM_PM_UPPER } else { AM_PM_LOWER };
    am_pm[t.hour12().0 as usize]
}

/// The UTC offset as a signed `HHMM` decimal, e.g. `-0700` becomes `-700`.
fn offset_hhmm<Tz>(t: &DateTime<Tz>) -> i64
where
    Tz: TimeZone,
{
    let secs = i64::from(t.offset().fix().local_minus_utc());
    let hhmm = secs.abs() / 3600 * 100 + secs.abs() % 3600 / 60;
    if secs < 0 { -hhmm } else { hhmm }
}

fn rfc822_offset<Tz>(t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
{
    let secs = i64::from(t.offset().fix().local_minus_utc());
    let sign = if secs < 0 { '-' } else { '+' };
    format!("{}{:02}{:02}", sign, secs.abs() / 3600, secs.abs() % 3600 / 60)
}

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const WEEKDAYS_LONG: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const AM_PM_UPPER: [&str; 2] = ["AM", "PM"];
const AM_PM_LOWER: [&str; 2] = ["am", "pm"];
