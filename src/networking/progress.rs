use crate::util::{convert_size, progress_percent};

/// Nothing is rendered until more than this many bytes have arrived.
const QUIET_BYTES: u64 = 1024;
const BAR_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Started,
    GettingThere,
    Halfway,
    Almost,
    NearlyDone,
    Complete,
}

impl Stage {
    pub fn for_percent(percent: u8) -> Self {
        match percent {
            100.. => Stage::Complete,
            90.. => Stage::NearlyDone,
            75.. => Stage::Almost,
            50.. => Stage::Halfway,
            20.. => Stage::GettingThere,
            _ => Stage::Started,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Started => "[Aaand We're Off]",
            Stage::GettingThere => "[Getting There...]",
            Stage::Halfway => "[Halfway Point]",
            Stage::Almost => "[Almost...]",
            Stage::NearlyDone => "[Just A Little More...]",
            Stage::Complete => "[Complete]",
        }
    }
}

/// Console progress for one artifact transfer.
#[derive(Debug)]
pub struct DownloadProgress {
    name: String,
    transferred: u64,
    total: Option<u64>,
    stage: Stage,
    widest: usize,
}

impl DownloadProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transferred: 0,
            total: None,
            stage: Stage::Started,
            widest: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Record a transfer callback and return the line to display, if any.
    ///
    /// Lines are padded to the widest one returned so far so that a shorter
    /// line fully overwrites the previous one after a carriage return.
    pub fn update(&mut self, transferred: u64, total: Option<u64>) -> Option<String> {
        let line = self.render(transferred, total)?;
        let len = line.chars().count();
        self.widest = self.widest.max(len);
        Some(format!("{line}{}", " ".repeat(self.widest - len)))
    }

    fn render(&mut self, transferred: u64, total: Option<u64>) -> Option<String> {
        self.transferred = transferred;
        self.total = total;
        if transferred <= QUIET_BYTES {
            return None;
        }

        let Some(percent) = progress_percent(transferred, total) else {
            return Some(format!(
                "-> Downloading {} | Received: {}",
                self.name,
                convert_size(transferred, true)
            ));
        };

        self.stage = self.stage.max(Stage::for_percent(percent));
        let total_text = convert_size(total.unwrap_or_default(), true);
        let done_text = convert_size(transferred, true);
        Some(format!(
            "-> Downloading {} | Progress: {:>3}% {} {:>width$} / {} | Status: {:<label_width$}",
            self.name,
            percent,
            render_bar(percent),
            done_text,
            total_text,
            self.stage.label(),
            width = total_text.len(),
            label_width = LABEL_WIDTH,
        ))
    }
}

fn render_bar(percent: u8) -> String {
    let filled = BAR_WIDTH * usize::from(percent.min(100)) / 100;
    format!("[{}{}]", "█".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}
