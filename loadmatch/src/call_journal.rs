//! Append-only journal of call outcomes.
//!
//! Each completed call is recorded as a length-prefixed bincode entry in a
//! single file. The header keeps the record count; positions are rebuilt
//! by scanning on open.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const HEADER_SIZE: u64 = 8; // 8 bytes for record count
const RECORD_HEADER_SIZE: u64 = 8; // 8 bytes for record size

/// Outcome of one inbound carrier call, as reported by the voice agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub session_id: Option<String>,
    pub mc_number: String,
    pub carrier_name: String,
    pub load_id: Option<u64>,
    pub outcome: String,
    pub sentiment: String,
    pub summary: String,
    pub duration_secs: u64,
    pub created_at: u64,
}

impl CallRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: Option<String>,
        mc_number: String,
        carrier_name: String,
        load_id: Option<u64>,
        outcome: String,
        sentiment: String,
        summary: String,
        duration_secs: u64,
    ) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            id: Uuid::new_v4().to_string(),
            session_id,
            mc_number,
            carrier_name,
            load_id,
            outcome,
            sentiment,
            summary,
            duration_secs,
            created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JournalHeader {
    count: u64,
}

#[derive(Debug)]
pub struct CallJournal {
    file: File,
    count: u64,
    record_positions: BTreeMap<u64, u64>, // sequence -> file position
}

#[allow(unused)]
impl CallJournal {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;

        let mut journal = CallJournal {
            file,
            count: 0,
            record_positions: BTreeMap::new(),
        };

        if journal.file.metadata()?.len() == 0 {
            journal.write_header()?;
        } else {
            journal.read_header()?;
            journal.rebuild_record_positions()?;
        }

        Ok(journal)
    }

    fn write_header(&mut self) -> io::Result<()> {
        let header = JournalHeader { count: self.count };
        let header_bytes =
            bincode::serialize(&header).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header_bytes)?;
        Ok(())
    }

    fn read_header(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut header_bytes = vec![0u8; HEADER_SIZE as usize];
        self.file.read_exact(&mut header_bytes)?;

        let header: JournalHeader = bincode::deserialize(&header_bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        self.count = header.count;
        Ok(())
    }

    fn write_record_header(&mut self, size: u64) -> io::Result<()> {
        let size_bytes = size.to_le_bytes();
        self.file.write_all(&size_bytes)?;
        Ok(())
    }

    fn read_record_header(&mut self) -> io::Result<u64> {
        let mut size_bytes = [0u8; 8];
        self.file.read_exact(&mut size_bytes)?;
        Ok(u64::from_le_bytes(size_bytes))
    }

    fn rebuild_record_positions(&mut self) -> io::Result<()> {
        self.record_positions.clear();
        let mut pos = HEADER_SIZE;

        while pos < self.file.metadata()?.len() {
            self.file.seek(SeekFrom::Start(pos))?;
            let record_size = self.read_record_header()?;
            let sequence = self.record_positions.len() as u64 + 1;
            self.record_positions.insert(sequence, pos);
            pos += RECORD_HEADER_SIZE + record_size;
        }

        // The scan, not the header, is authoritative: a record appended
        // before the header update must still be visible after reopen.
        self.count = self.record_positions.len() as u64;

        Ok(())
    }

    /// Appends one record, returning its 1-based sequence number.
    pub fn append(&mut self, record: &CallRecord) -> io::Result<u64> {
        let data =
            bincode::serialize(record).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        let pos = self.file.seek(SeekFrom::End(0))?;
        self.write_record_header(data.len() as u64)?;
        self.file.write_all(&data)?;

        self.count += 1;
        self.record_positions.insert(self.count, pos);
        self.write_header()?;
        Ok(self.count)
    }

    pub fn read_record(&mut self, sequence: u64) -> io::Result<CallRecord> {
        if sequence == 0 || sequence > self.count {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Sequence out of range",
            ));
        }

        let pos = self.record_positions.get(&sequence).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "Record position not found")
        })?;

        self.file.seek(SeekFrom::Start(*pos))?;
        let record_size = self.read_record_header()?;

        let mut data = vec![0u8; record_size as usize];
        self.file.read_exact(&mut data)?;
        bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    pub fn records(&mut self) -> io::Result<Vec<CallRecord>> {
        (1..=self.count).map(|seq| self.read_record(seq)).collect()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn record(mc_number: &str, outcome: &str) -> CallRecord {
        CallRecord::new(
            Some("session-1".to_string()),
            mc_number.to_string(),
            "Acme Trucking LLC".to_string(),
            Some(42),
            outcome.to_string(),
            "positive".to_string(),
            "Carrier accepted the Chicago to Dallas load.".to_string(),
            212,
        )
    }

    #[test]
    fn test_journal_creation() {
        let temp_file = NamedTempFile::new().unwrap();
        let journal = CallJournal::open(temp_file.path()).unwrap();

        assert_eq!(journal.count(), 0);
        assert!(journal.is_empty());
    }

    #[test]
    fn test_journal_append_and_read() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut journal = CallJournal::open(temp_file.path()).unwrap();

        let first = record("MC123456", "booked");
        let second = record("MC654321", "declined");
        assert_eq!(journal.append(&first).unwrap(), 1);
        assert_eq!(journal.append(&second).unwrap(), 2);
        assert!(!journal.is_empty());

        assert_eq!(journal.read_record(1).unwrap(), first);
        assert_eq!(journal.read_record(2).unwrap(), second);
        assert!(journal.read_record(3).is_err());
    }

    #[test]
    fn test_reopen_recovers_record_missing_from_header() {
        let temp_file = NamedTempFile::new().unwrap();
        let first = record("MC123456", "booked");
        let second = record("MC654321", "declined");
        {
            let mut journal = CallJournal::open(temp_file.path()).unwrap();
            journal.append(&first).unwrap();
            journal.append(&second).unwrap();
            // Roll the header back as if the process died between the
            // record write and the header update.
            journal.count = 1;
            journal.write_header().unwrap();
        }

        let mut journal = CallJournal::open(temp_file.path()).unwrap();
        assert_eq!(journal.count(), 2);
        assert_eq!(journal.records().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_journal_reopen_rebuilds_positions() {
        let temp_file = NamedTempFile::new().unwrap();
        let first = record("MC123456", "booked");
        let second = record("MC654321", "no_match");
        {
            let mut journal = CallJournal::open(temp_file.path()).unwrap();
            journal.append(&first).unwrap();
            journal.append(&second).unwrap();
        }

        let mut journal = CallJournal::open(temp_file.path()).unwrap();
        assert_eq!(journal.count(), 2);
        let records = journal.records().unwrap();
        assert_eq!(records, vec![first, second]);
    }
}
