// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Metadata encoded in utterance flow log file names.
//!
//! The agent logger writes
//! `{timestamp}_{thread}_User_Utterance_Flow_Log_{message_id}_{code}.dot`, where `timestamp`
//! is `YYYYMMDD_HHMMSS`, `message_id` is lowercase hex and `code` names the program that
//! produced the log.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::model::FileName;

pub const VISUALIZATION_TYPE: &str = "Utterance_Flow_Log";
pub const PATTERN_MISMATCH_MESSAGE: &str = "Filename pattern does not match expected format.";

const LOG_FILE_PATTERN: &str = r"^(?P<ts>\d{8}_\d{6})_(?P<thread>.*?)_User_Utterance_Flow_Log_(?P<uid>[a-f0-9]+)_(?P<code>.*)\.dot$";

fn log_file_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(LOG_FILE_PATTERN).ok()).as_ref()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFileInfo {
    pub file_name: FileName,
    pub timestamp: String,
    pub thread_id: String,
    pub message_id: String,
    pub code_name: String,
}

impl LogFileInfo {
    /// Decodes a log file name; `None` when the name does not follow the logger's pattern.
    pub fn parse(file_name: &FileName) -> Option<Self> {
        let captures = log_file_regex()?.captures(file_name.as_str())?;
        Some(Self {
            file_name: file_name.clone(),
            timestamp: captures["ts"].to_owned(),
            thread_id: captures["thread"].to_owned(),
            message_id: captures["uid"].to_owned(),
            code_name: captures["code"].to_owned(),
        })
    }

    /// Name of the program file that produced the log.
    pub fn code_file_name(&self) -> String {
        format!("{}.dot", self.code_name)
    }

    /// `YYYY-MM-DD HH:MM:SS` rendering of the raw `YYYYMMDD_HHMMSS` timestamp.
    pub fn display_timestamp(&self) -> String {
        let ts = &self.timestamp;
        if ts.len() != 15 || !ts.is_ascii() {
            return ts.clone();
        }
        format!(
            "{}-{}-{} {}:{}:{}",
            &ts[0..4],
            &ts[4..6],
            &ts[6..8],
            &ts[9..11],
            &ts[11..13],
            &ts[13..15]
        )
    }

    /// Label/value rows for the metadata panel.
    pub fn metadata_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Code filename", self.code_file_name()),
            ("Thread ID", self.thread_id.clone()),
            ("Timestamp", self.timestamp.clone()),
            ("User Message ID", self.message_id.clone()),
            ("Visualization type", VISUALIZATION_TYPE.to_owned()),
        ]
    }
}

/// code name -> thread id -> entries, newest first.
pub type LogGroups = BTreeMap<String, BTreeMap<String, Vec<LogFileInfo>>>;

/// Groups log files by producing program, then by thread.
///
/// Names that are not log files are left out.
pub fn group_log_files<'a, I>(names: I) -> LogGroups
where
    I: IntoIterator<Item = &'a FileName>,
{
    let mut groups = LogGroups::new();
    for info in names.into_iter().filter_map(LogFileInfo::parse) {
        groups
            .entry(info.code_name.clone())
            .or_default()
            .entry(info.thread_id.clone())
            .or_default()
            .push(info);
    }

    for threads in groups.values_mut() {
        for entries in threads.values_mut() {
            entries.sort_by(|a, b| {
                b.timestamp
                    .cmp(&a.timestamp)
                    .then_with(|| a.file_name.as_str().cmp(b.file_name.as_str()))
            });
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::{group_log_files, LogFileInfo, VISUALIZATION_TYPE};
    use crate::model::FileName;

    fn name(value: &str) -> FileName {
        FileName::new(value).expect("file name")
    }

    #[test]
    fn parses_logger_file_names() {
        let info = LogFileInfo::parse(&name(
            "20250301_101500_thread_abc_20250301_101400_User_Utterance_Flow_Log_9f3a_quick_start.dot",
        ))
        .expect("log file");

        assert_eq!(info.timestamp, "20250301_101500");
        assert_eq!(info.thread_id, "thread_abc_20250301_101400");
        assert_eq!(info.message_id, "9f3a");
        assert_eq!(info.code_name, "quick_start");
        assert_eq!(info.code_file_name(), "quick_start.dot");
        assert_eq!(info.display_timestamp(), "2025-03-01 10:15:00");
        assert_eq!(
            info.metadata_rows().last(),
            Some(&("Visualization type", VISUALIZATION_TYPE.to_owned()))
        );
    }

    #[test]
    fn rejects_other_names() {
        assert_eq!(LogFileInfo::parse(&name("a.dot")), None);
        assert_eq!(
            LogFileInfo::parse(&name("20250301_101500_t_User_Utterance_Flow_Log_XYZ_code.dot")),
            None
        );
    }

    #[test]
    fn groups_by_code_then_thread_newest_first() {
        let names = [
            name("20250301_101500_t1_User_Utterance_Flow_Log_aa_bot.dot"),
            name("20250302_090000_t1_User_Utterance_Flow_Log_bb_bot.dot"),
            name("20250301_120000_t2_User_Utterance_Flow_Log_cc_bot.dot"),
            name("20250303_080000_t1_User_Utterance_Flow_Log_dd_agent.dot"),
            name("notes.dot"),
        ];

        let groups = group_log_files(&names);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["agent", "bot"]);
        let bot = &groups["bot"];
        assert_eq!(bot.keys().collect::<Vec<_>>(), vec!["t1", "t2"]);
        let stamps = bot["t1"].iter().map(|info| info.timestamp.as_str()).collect::<Vec<_>>();
        assert_eq!(stamps, vec!["20250302_090000", "20250301_101500"]);
    }
}
