use super::{Attribute, Dataset};
use crate::error::ModelError;

const WEATHER_HEADERS: &str = "
outlook:sunny,overcast,rainy
temperature:hot,mild,cool
humidity:high,normal
windy:FALSE,TRUE
play:yes,no
";

const WEATHER_DATA: &str = "
sunny,hot,high,FALSE,no
sunny,hot,high,TRUE,no
overcast,hot,high,FALSE,yes
rainy,mild,high,FALSE,yes
rainy,cool,normal,FALSE,yes
rainy,cool,normal,TRUE,no
overcast,cool,normal,TRUE,yes
sunny,mild,high,FALSE,no
sunny,cool,normal,FALSE,yes
rainy,mild,normal,FALSE,yes
sunny,mild,normal,TRUE,yes
overcast,mild,high,TRUE,yes
rainy,mild,high,TRUE,no
overcast,hot,normal,FALSE,yes
";

/// Loads the nominal weather dataset
///
/// The weather dataset is the classic 14-instance "play tennis" problem. All five
/// attributes are categorical and the last one (`play`) is the class:
/// - outlook: sunny, overcast, rainy
/// - temperature: hot, mild, cool
/// - humidity: high, normal
/// - windy: FALSE, TRUE
/// - play: yes, no
///
/// # Returns
///
/// - `Ok(Dataset)` - The dataset with shape (14, 5) and class index 4
/// - `Err(ModelError)` - Only if the embedded data were malformed
///
/// # Example
///
/// ```
/// use rustytree::dataset::weather::load_weather;
///
/// let data = load_weather().unwrap();
/// assert_eq!(data.num_instances(), 14);
/// assert_eq!(data.num_attributes(), 5);
/// assert_eq!(data.class_attribute().name(), "play");
/// ```
pub fn load_weather() -> Result<Dataset, ModelError> {
    let attributes = WEATHER_HEADERS
        .trim()
        .lines()
        .map(|line| {
            let (name, values) = line.split_once(':').ok_or_else(|| {
                ModelError::InputValidationError(format!("malformed header line '{}'", line))
            })?;
            Attribute::categorical(name, values.split(','))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows: Vec<Vec<&str>> = WEATHER_DATA
        .trim()
        .lines()
        .map(|line| line.split(',').collect())
        .collect();

    let class_index = attributes.len() - 1;
    Dataset::from_nominal_rows(attributes, &rows, class_index)
}
