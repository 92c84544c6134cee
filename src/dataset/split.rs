use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::warn;

/// Train/test partition of the utterance keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSplit {
    pub train: Vec<String>,
    pub test: Vec<String>,
}

/// Shuffles the sorted `keys` with a generator seeded from `seed` and takes the first
/// `test_num` as the test group. The same inputs always give the same split.
pub fn shuffle_split(
    keys: impl IntoIterator<Item = String>,
    seed: u64,
    test_num: usize,
) -> DatasetSplit {
    let mut keys: Vec<String> = keys.into_iter().collect();
    keys.sort();

    let mut rng = StdRng::seed_from_u64(seed);
    keys.shuffle(&mut rng);

    let test_num = if test_num > keys.len() {
        warn!(
            test_num,
            keys = keys.len(),
            "test_num exceeds the number of utterances; every utterance goes to test"
        );
        keys.len()
    } else {
        test_num
    };

    let train = keys.split_off(test_num);
    DatasetSplit { train, test: keys }
}
