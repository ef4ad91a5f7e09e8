//! Trace parsing for the simulation driver.
//!
//! A trace is a whitespace-separated stream of integer tokens consumed
//! three at a time: `pid address write`. There is no line structure; a
//! record may span lines. An address of [`TERMINATE_ADDRESS`] means the
//! process leaves the simulation, and its write flag is ignored.

use crate::process::ProcessId;
use thiserror::Error;

/// The sentinel address that terminates a process.
pub const TERMINATE_ADDRESS: i64 = -1;

/// A malformed trace. These surface before any record reaches the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// A token was not an integer.
    #[error("trace token {index} ({token:?}) is not an integer")]
    NotAnInteger {
        /// 1-based position of the token in the stream.
        index: usize,
        /// The offending token text.
        token: String,
    },
    /// The stream ended partway through a record.
    #[error("trace ended mid-record with {got} of 3 tokens")]
    TruncatedRecord {
        /// Tokens present in the final, incomplete record.
        got: usize,
    },
    /// A process id that does not fit the id space.
    #[error("record {record}: process id {pid} is not a valid id")]
    BadPid {
        /// 1-based record number.
        record: usize,
        /// The offending id value.
        pid: i64,
    },
    /// A negative address other than the terminate sentinel.
    #[error("record {record}: negative address {address} (only {TERMINATE_ADDRESS} is meaningful)")]
    NegativeAddress {
        /// 1-based record number.
        record: usize,
        /// The offending address value.
        address: i64,
    },
    /// A write flag other than 0 or 1.
    #[error("record {record}: write flag {flag} is not 0 or 1")]
    BadWriteFlag {
        /// 1-based record number.
        record: usize,
        /// The offending flag value.
        flag: i64,
    },
}

/// What a single trace record asks the simulation to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOp {
    /// Reference `address`, writing it if `write` is set.
    Access {
        /// The logical address being referenced.
        address: u64,
        /// Whether the reference is a write.
        write: bool,
    },
    /// The process leaves the simulation; its frames are released.
    Terminate,
}

/// One parsed trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    /// The process issuing the reference.
    pub pid: ProcessId,
    /// What the process does.
    pub op: TraceOp,
}

/// Parses a whole trace.
///
/// # Errors
///
/// Returns a [`TraceError`] naming the offending token or record; nothing
/// is returned from a malformed trace, so the core never sees partial
/// input.
pub fn parse(input: &str) -> Result<Vec<TraceRecord>, TraceError> {
    let mut values = Vec::new();
    for (index, token) in input.split_whitespace().enumerate() {
        let value: i64 = token.parse().map_err(|_| TraceError::NotAnInteger {
            index: index + 1,
            token: token.to_owned(),
        })?;
        values.push(value);
    }

    let chunks = values.chunks_exact(3);
    if !chunks.remainder().is_empty() {
        return Err(TraceError::TruncatedRecord {
            got: chunks.remainder().len(),
        });
    }

    let mut records = Vec::with_capacity(values.len() / 3);
    for (number, chunk) in chunks.enumerate() {
        let record = number + 1;
        let (pid, address, flag) = (chunk[0], chunk[1], chunk[2]);

        let pid = u32::try_from(pid)
            .map(ProcessId::new)
            .map_err(|_| TraceError::BadPid { record, pid })?;

        let op = if address == TERMINATE_ADDRESS {
            TraceOp::Terminate
        } else if address < 0 {
            return Err(TraceError::NegativeAddress { record, address });
        } else {
            let write = match flag {
                0 => false,
                1 => true,
                _ => return Err(TraceError::BadWriteFlag { record, flag }),
            };
            TraceOp::Access {
                address: address as u64,
                write,
            }
        };

        records.push(TraceRecord { pid, op });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_may_span_lines() {
        let records = parse("1 0 0 1\n32 1\n2 64\t0\n").unwrap();
        assert_eq!(
            records,
            vec![
                TraceRecord {
                    pid: ProcessId::new(1),
                    op: TraceOp::Access {
                        address: 0,
                        write: false,
                    },
                },
                TraceRecord {
                    pid: ProcessId::new(1),
                    op: TraceOp::Access {
                        address: 32,
                        write: true,
                    },
                },
                TraceRecord {
                    pid: ProcessId::new(2),
                    op: TraceOp::Access {
                        address: 64,
                        write: false,
                    },
                },
            ]
        );
    }

    #[test]
    fn sentinel_terminates_and_ignores_the_flag() {
        let records = parse("3 -1 0 3 -1 1").unwrap();
        assert_eq!(records.len(), 2);
        for record in records {
            assert_eq!(record.pid, ProcessId::new(3));
            assert_eq!(record.op, TraceOp::Terminate);
        }
    }

    #[test]
    fn empty_trace_is_empty() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("  \n\t ").unwrap(), vec![]);
    }

    #[test]
    fn non_integer_token_is_rejected() {
        let err = parse("1 0 0 two 0 0").unwrap_err();
        assert_eq!(
            err,
            TraceError::NotAnInteger {
                index: 4,
                token: "two".to_owned(),
            }
        );
    }

    #[test]
    fn truncated_record_is_rejected() {
        assert_eq!(
            parse("1 0 0 2 32").unwrap_err(),
            TraceError::TruncatedRecord { got: 2 }
        );
    }

    #[test]
    fn negative_address_other_than_sentinel_is_rejected() {
        assert_eq!(
            parse("1 -2 0").unwrap_err(),
            TraceError::NegativeAddress {
                record: 1,
                address: -2,
            }
        );
    }

    #[test]
    fn bad_pid_and_flag_are_rejected() {
        assert_eq!(
            parse("-1 0 0").unwrap_err(),
            TraceError::BadPid { record: 1, pid: -1 }
        );
        assert_eq!(
            parse("1 0 2").unwrap_err(),
            TraceError::BadWriteFlag { record: 1, flag: 2 }
        );
    }
}
