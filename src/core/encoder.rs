//! Record encoders
//!
//! Two encodings share one [`EncoderConfig`]:
//! - Json: one machine-parseable object per line
//! - Console: tab-separated, human-readable line with optional level colors
//!
//! ```text
//! {"time":"2025-01-08T10:30:45.123Z","level":"INFO","caller":"src/main.rs:12","message":"started","port":8080}
//! 2025-01-08T10:30:45.123Z	INFO	src/main.rs:12	started	{"port":8080}
//! ```

use super::field::{Field, FieldValue};
use super::log_level::LogLevel;
use super::record::{Caller, LogRecord};
use super::timestamp::TimestampFormat;
use colored::Colorize;
use serde_json::Value;

/// How level labels are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelFormat {
    /// `INFO`
    #[default]
    Capital,
    /// `INFO`, wrapped in the level's terminal color
    CapitalColor,
    /// `info`
    Lowercase,
}

/// How the call site is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallerFormat {
    /// `dir/file.rs:line`
    #[default]
    Short,
    /// Full source path and line
    Full,
}

/// How duration field values are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationFormat {
    /// Human-readable string, e.g. `1.5s` or `250ms`
    #[default]
    String,
    /// Floating-point milliseconds
    Millis,
    /// Floating-point seconds
    Seconds,
}

/// Field naming and value rendering shared by every encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    pub time_format: TimestampFormat,
    pub level_format: LevelFormat,
    pub caller_format: CallerFormat,
    pub duration_format: DurationFormat,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_key: "time".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "message".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            line_ending: "\n".to_string(),
            time_format: TimestampFormat::Iso8601,
            level_format: LevelFormat::Capital,
            caller_format: CallerFormat::Short,
            duration_format: DurationFormat::String,
        }
    }
}

impl EncoderConfig {
    #[must_use]
    pub fn with_level_format(mut self, format: LevelFormat) -> Self {
        self.level_format = format;
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    #[must_use]
    pub fn with_caller_format(mut self, format: CallerFormat) -> Self {
        self.caller_format = format;
        self
    }

    #[must_use]
    pub fn with_duration_format(mut self, format: DurationFormat) -> Self {
        self.duration_format = format;
        self
    }

    fn level_label(&self, level: LogLevel) -> String {
        match self.level_format {
            LevelFormat::Capital => level.to_str().to_string(),
            LevelFormat::CapitalColor => level.to_str().color(level.color_code()).to_string(),
            LevelFormat::Lowercase => level.as_lowercase().to_string(),
        }
    }

    fn caller_label(&self, caller: &Caller) -> String {
        match self.caller_format {
            CallerFormat::Short => caller.short(),
            CallerFormat::Full => caller.full(),
        }
    }

    fn field_value(&self, value: &FieldValue) -> Value {
        match value {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Uint(u) => Value::Number((*u).into()),
            FieldValue::Float(f) => float_value(*f),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Duration(d) => match self.duration_format {
                DurationFormat::String => Value::String(format!("{:?}", d)),
                DurationFormat::Millis => float_value(d.as_secs_f64() * 1000.0),
                DurationFormat::Seconds => float_value(d.as_secs_f64()),
            },
            FieldValue::Null => Value::Null,
        }
    }
}

fn float_value(f: f64) -> Value {
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Serialization applied on top of an [`EncoderConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Console,
}

#[derive(Debug, Clone)]
pub struct Encoder {
    encoding: Encoding,
    config: EncoderConfig,
}

impl Encoder {
    pub fn json(config: EncoderConfig) -> Self {
        Self {
            encoding: Encoding::Json,
            config,
        }
    }

    pub fn console(config: EncoderConfig) -> Self {
        Self {
            encoding: Encoding::Console,
            config,
        }
    }

    /// Render a record, line ending included
    pub fn encode(&self, record: &LogRecord) -> String {
        let mut out = match self.encoding {
            Encoding::Json => self.encode_json(record),
            Encoding::Console => self.encode_console(record),
        };
        out.push_str(&self.config.line_ending);
        out
    }

    fn encode_json(&self, record: &LogRecord) -> String {
        let config = &self.config;
        let mut obj = JsonObject::default();

        obj.push(
            &config.time_key,
            &config.time_format.to_json_value(&record.timestamp),
        );
        // Colors never belong in machine-readable output
        let level = match config.level_format {
            LevelFormat::Lowercase => record.level.as_lowercase(),
            _ => record.level.to_str(),
        };
        obj.push(&config.level_key, &Value::String(level.to_string()));
        if let Some(ref name) = record.logger_name {
            obj.push(&config.name_key, &Value::String(name.clone()));
        }
        if let Some(ref caller) = record.caller {
            obj.push(&config.caller_key, &Value::String(config.caller_label(caller)));
        }
        obj.push(&config.message_key, &Value::String(record.message.clone()));
        for field in &record.fields {
            obj.push(&field.key, &config.field_value(&field.value));
        }
        if let Some(ref stacktrace) = record.stacktrace {
            obj.push(&config.stacktrace_key, &Value::String(stacktrace.clone()));
        }

        obj.finish()
    }

    fn encode_console(&self, record: &LogRecord) -> String {
        let config = &self.config;
        let mut parts = vec![
            config.time_format.format(&record.timestamp),
            config.level_label(record.level),
        ];
        if let Some(ref name) = record.logger_name {
            parts.push(escape_line_breaks(name));
        }
        if let Some(ref caller) = record.caller {
            parts.push(config.caller_label(caller));
        }
        parts.push(escape_line_breaks(&record.message));
        if !record.fields.is_empty() {
            parts.push(self.fields_object(&record.fields));
        }

        let mut line = parts.join("\t");
        if let Some(ref stacktrace) = record.stacktrace {
            line.push('\n');
            line.push_str(stacktrace.trim_end());
        }
        line
    }

    fn fields_object(&self, fields: &[Field]) -> String {
        let mut obj = JsonObject::default();
        for field in fields {
            obj.push(&field.key, &self.config.field_value(&field.value));
        }
        obj.finish()
    }
}

/// Escape newlines, carriage returns and tabs so free text cannot start a
/// new console line (log injection)
fn escape_line_breaks(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Order-preserving JSON object writer; duplicate keys are written as given
#[derive(Default)]
struct JsonObject {
    buf: String,
}

impl JsonObject {
    fn push(&mut self, key: &str, value: &Value) {
        self.buf.push(if self.buf.is_empty() { '{' } else { ',' });
        self.buf.push_str(&Value::String(key.to_string()).to_string());
        self.buf.push(':');
        self.buf.push_str(&value.to_string());
    }

    fn finish(mut self) -> String {
        if self.buf.is_empty() {
            self.buf.push('{');
        }
        self.buf.push('}');
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    fn sample_record() -> LogRecord {
        let mut record = LogRecord::new(LogLevel::Warn, "disk almost full")
            .with_caller(Caller {
                file: "src/storage/disk.rs",
                line: 88,
            })
            .with_fields(vec![
                Field::new("mount", "/var"),
                Field::new("used_pct", 93),
                Field::duration("elapsed", Duration::from_millis(1500)),
            ]);
        record.timestamp = chrono::Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        record
    }

    #[test]
    fn test_json_line_layout() {
        let line = Encoder::json(EncoderConfig::default()).encode(&sample_record());
        assert_eq!(
            line,
            "{\"time\":\"2025-01-08T10:30:45.000Z\",\"level\":\"WARN\",\
             \"caller\":\"storage/disk.rs:88\",\"message\":\"disk almost full\",\
             \"mount\":\"/var\",\"used_pct\":93,\"elapsed\":\"1.5s\"}\n"
        );
    }

    #[test]
    fn test_json_is_parseable() {
        let record = sample_record()
            .with_logger_name(Some("api.users".to_string()))
            .with_stacktrace("frame 0\nframe 1".to_string());
        let line = Encoder::json(EncoderConfig::default()).encode(&record);
        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["logger"], "api.users");
        assert_eq!(parsed["stacktrace"], "frame 0\nframe 1");
        assert_eq!(parsed["used_pct"], 93);
    }

    #[test]
    fn test_json_strips_colors() {
        let config = EncoderConfig::default().with_level_format(LevelFormat::CapitalColor);
        let line = Encoder::json(config).encode(&sample_record());
        assert!(line.contains("\"level\":\"WARN\""));
    }

    #[test]
    fn test_console_line_layout() {
        let line = Encoder::console(EncoderConfig::default()).encode(&sample_record());
        assert_eq!(
            line,
            "2025-01-08T10:30:45.000Z\tWARN\tstorage/disk.rs:88\tdisk almost full\t\
             {\"mount\":\"/var\",\"used_pct\":93,\"elapsed\":\"1.5s\"}\n"
        );
    }

    #[test]
    fn test_console_stacktrace_on_following_lines() {
        let record = sample_record().with_stacktrace("frame 0\nframe 1\n".to_string());
        let line = Encoder::console(EncoderConfig::default()).encode(&record);
        assert!(line.ends_with("\nframe 0\nframe 1\n"));
    }

    #[test]
    fn test_duration_formats() {
        let config = EncoderConfig::default().with_duration_format(DurationFormat::Millis);
        let value = config.field_value(&FieldValue::Duration(Duration::from_millis(1500)));
        assert_eq!(value, serde_json::json!(1500.0));

        let config = EncoderConfig::default().with_duration_format(DurationFormat::Seconds);
        let value = config.field_value(&FieldValue::Duration(Duration::from_millis(1500)));
        assert_eq!(value, serde_json::json!(1.5));
    }

    #[test]
    fn test_nan_renders_as_null() {
        let value = EncoderConfig::default().field_value(&FieldValue::Float(f64::NAN));
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_duplicate_keys_preserved() {
        let record = LogRecord::new(LogLevel::Info, "dup")
            .with_fields(vec![Field::new("k", 1), Field::new("k", 2)]);
        let line = Encoder::json(EncoderConfig::default()).encode(&record);
        assert!(line.contains("\"k\":1,\"k\":2"));
    }

    #[test]
    fn test_full_caller_and_lowercase_level() {
        let config = EncoderConfig::default()
            .with_caller_format(CallerFormat::Full)
            .with_level_format(LevelFormat::Lowercase);
        let line = Encoder::console(config).encode(&sample_record());
        assert!(line.contains("\twarn\tsrc/storage/disk.rs:88\t"));
    }

    #[test]
    fn test_json_message_keeps_line_breaks() {
        let message = "line one\nline two\tC:\\path";
        let record = LogRecord::new(LogLevel::Info, message)
            .with_fields(vec![Field::new("note", "a\nb")]);
        let line = Encoder::json(EncoderConfig::default()).encode(&record);
        assert_eq!(line.lines().count(), 1);

        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["message"], message);
        assert_eq!(parsed["note"], "a\nb");
    }

    #[test]
    fn test_console_escapes_message_and_name() {
        let record = LogRecord::new(LogLevel::Info, "line one\nFAKE ERROR\tentry\r")
            .with_logger_name(Some("a\nb".to_string()));
        let line = Encoder::console(EncoderConfig::default()).encode(&record);

        assert_eq!(line.lines().count(), 1);
        let parts: Vec<&str> = line.trim_end().split('\t').collect();
        assert_eq!(parts[2], "a\\nb");
        assert_eq!(parts[3], "line one\\nFAKE ERROR\\tentry\\r");
    }
}
