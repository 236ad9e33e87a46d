/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Linear axis spanning exactly `[min, max]`, with "nice number" ticks
    /// inside the range.
    pub fn linear(min: f64, max: f64, target_ticks: usize) -> Self {
        let (min, max) = if max > min { (min, max) } else { (min - 1.0, min + 1.0) };
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);
        let eps = step * 1e-6;

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut k = (min / step - 1e-9).ceil();
        while k * step <= max + eps {
            let v = k * step;
            ticks.push(v);
            labels.push(format_tick(v, step));
            k += 1.0;
        }

        // Minor ticks: 5 subdivisions per major
        let minor_step = step / 5.0;
        let mut minor = Vec::new();
        let mut m = (min / minor_step - 1e-9).ceil();
        while m * minor_step <= max + eps {
            let mv = m * minor_step;
            if !ticks.iter().any(|t| (t - mv).abs() < minor_step * 0.01) {
                minor.push(mv);
            }
            m += 1.0;
        }

        Self {
            min,
            max,
            log: false,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// Logarithmic axis spanning `[min, max]`; non-positive bounds are
    /// clamped.
    pub fn log(min: f64, max: f64) -> Self {
        let min = if min > 0.0 { min } else { 1e-3 };
        let max = if max > min { max } else { min * 10.0 };
        let lo = min.log10().floor() as i32;
        let hi = max.log10().ceil() as i32;

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();
        for exp in lo..=hi {
            let v = 10.0_f64.powi(exp);
            if v >= min * (1.0 - 1e-9) && v <= max * (1.0 + 1e-9) {
                ticks.push(v);
                labels.push(format!("10{}", superscript(exp)));
            }
            for m in 2..=9 {
                let mv = m as f64 * v;
                if mv > min && mv < max {
                    minor.push(mv);
                }
            }
        }

        Self {
            min,
            max,
            log: true,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Drop tick labels (shared x axis of a main panel above a ratio).
    pub fn without_tick_labels(mut self) -> Self {
        self.tick_labels.clear();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = if self.log {
            let v = value.max(self.min * 1e-3).ln();
            (v - self.min.ln()) / (self.max.ln() - self.min.ln())
        } else {
            (value - self.min) / (self.max - self.min)
        };
        px_min + frac * (px_max - px_min)
    }
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 { format!("{}", v.round() as i64) } else { format!("{:.prec$}", v, prec = decimals) }
}

fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            '9' => '\u{2079}',
            _ => c,
        })
        .collect()
}
