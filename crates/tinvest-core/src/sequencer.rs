use crate::Operation;

/// Order operations by execution time, ascending.
///
/// The sort is stable: operations sharing a timestamp (partial fills of one
/// order, for instance) keep their feed order.
pub fn sort(mut operations: Vec<Operation>) -> Vec<Operation> {
    operations.sort_by_key(|operation| operation.time);
    operations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Figi, OperationKind, UtcDateTime};

    fn op(id: &str, time: &str) -> Operation {
        Operation {
            id: id.to_owned(),
            figi: Figi::parse("BBG000B9XRY4").expect("figi"),
            kind: OperationKind::Buy,
            time: UtcDateTime::parse(time).expect("time"),
            quantity: 1.0,
            price: 1.0,
            value: 1.0,
            commission: 0.0,
            currency: String::from("USD"),
        }
    }

    fn ids(operations: &[Operation]) -> Vec<&str> {
        operations.iter().map(|op| op.id.as_str()).collect()
    }

    #[test]
    fn orders_by_time_ascending() {
        let sorted = sort(vec![
            op("c", "2020-03-03T00:00:00Z"),
            op("a", "2020-03-01T00:00:00Z"),
            op("b", "2020-03-02T00:00:00Z"),
        ]);
        assert_eq!(ids(&sorted), ["a", "b", "c"]);
    }

    #[test]
    fn equal_timestamps_keep_feed_order() {
        let sorted = sort(vec![
            op("late", "2020-03-02T00:00:00Z"),
            op("fill-1", "2020-03-01T12:00:00+03:00"),
            op("fill-2", "2020-03-01T09:00:00Z"),
        ]);
        assert_eq!(ids(&sorted), ["fill-1", "fill-2", "late"]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(sort(Vec::new()).is_empty());
    }
}
