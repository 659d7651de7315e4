use chrono::{DateTime, Utc};
use common::models::{ChartDataset, PriceObservation};

/// Reshape observations into chart labels and values, one entry per observation
pub fn transform(observations: &[PriceObservation]) -> ChartDataset {
    let mut dataset = ChartDataset {
        labels: Vec::with_capacity(observations.len()),
        values: Vec::with_capacity(observations.len()),
    };

    for observation in observations {
        dataset.labels.push(format_label(observation.timestamp));
        dataset.values.push(observation.open_rate);
    }

    dataset
}

/// en-US date-time form, e.g. `10/13/2022, 4:00:00 PM` (UTC)
pub fn format_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn observations(count: usize) -> Vec<PriceObservation> {
        let start = Utc.with_ymd_and_hms(2022, 10, 13, 16, 0, 0).unwrap();
        (0..count)
            .map(|i| PriceObservation {
                timestamp: start + Duration::hours(8 * i as i64),
                open_rate: 19000.0 + i as f64 * 12.5,
            })
            .collect()
    }

    #[test]
    fn preserves_order_and_cardinality() {
        let input = observations(10);
        let dataset = transform(&input);

        assert_eq!(dataset.labels.len(), input.len());
        assert_eq!(dataset.values.len(), input.len());
        for (i, observation) in input.iter().enumerate() {
            assert_eq!(dataset.labels[i], format_label(observation.timestamp));
            assert_eq!(dataset.values[i], observation.open_rate);
        }
    }

    #[test]
    fn empty_input_gives_empty_dataset() {
        assert!(transform(&[]).is_empty());
    }

    #[test]
    fn labels_use_twelve_hour_clock() {
        let afternoon = Utc.with_ymd_and_hms(2022, 10, 13, 16, 0, 0).unwrap();
        assert_eq!(format_label(afternoon), "10/13/2022, 4:00:00 PM");

        let midnight = Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(format_label(midnight), "1/5/2023, 12:00:00 AM");
    }
}
