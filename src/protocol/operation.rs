/// The closed set of operations a remote party can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListServices,
    DescribeServices,
    QueryStatus,
    SubmitWork,
    CancelWork,
}

/// Exclusive lower sentinel for integer operation codes.
pub const OPERATION_CODE_FLOOR: i64 = 0;
/// Exclusive upper sentinel for integer operation codes.
pub const OPERATION_CODE_CEIL: i64 = 6;

impl Operation {
    /// Every operation kind, in code order.
    pub const ALL: [Operation; 5] = [
        Operation::ListServices,
        Operation::DescribeServices,
        Operation::QueryStatus,
        Operation::SubmitWork,
        Operation::CancelWork,
    ];

    pub fn code(self) -> i64 {
        match self {
            Operation::ListServices => 1,
            Operation::DescribeServices => 2,
            Operation::QueryStatus => 3,
            Operation::SubmitWork => 4,
            Operation::CancelWork => 5,
        }
    }

    /// Decode an integer code, accepted only strictly inside the sentinel
    /// bounds.
    pub fn from_code(code: i64) -> Option<Self> {
        if code <= OPERATION_CODE_FLOOR || code >= OPERATION_CODE_CEIL {
            return None;
        }
        match code {
            1 => Some(Operation::ListServices),
            2 => Some(Operation::DescribeServices),
            3 => Some(Operation::QueryStatus),
            4 => Some(Operation::SubmitWork),
            5 => Some(Operation::CancelWork),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::ListServices => "list_services",
            Operation::DescribeServices => "describe_services",
            Operation::QueryStatus => "query_status",
            Operation::SubmitWork => "submit_work",
            Operation::CancelWork => "cancel_work",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "list_services" => Some(Operation::ListServices),
            "describe_services" => Some(Operation::DescribeServices),
            "query_status" => Some(Operation::QueryStatus),
            "submit_work" => Some(Operation::SubmitWork),
            "cancel_work" => Some(Operation::CancelWork),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
