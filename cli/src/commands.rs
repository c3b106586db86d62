use anyhow::{bail, Context as _, Result};
use hmerkle_core::{
    hasher::{Blake3Hasher, Keccak256Hasher, Md5Hasher, Sha256Hasher, Sha512Hasher},
    proof::{self, Witness, WitnessNode},
    BinaryHash, Tree,
};
use tracing::{debug, info, trace};

use crate::cli::{prove, Cli, Commands, HashKind, TreeParams, DEMO_LABELS};

pub fn run(cli: Cli) -> Result<()> {
    let labels = load_labels(&cli.tree)?;
    match cli.tree.hasher {
        HashKind::Sha256 => run_with::<Sha256Hasher>(labels, cli.command),
        HashKind::Sha512 => run_with::<Sha512Hasher>(labels, cli.command),
        HashKind::Blake3 => run_with::<Blake3Hasher>(labels, cli.command),
        HashKind::Keccak256 => run_with::<Keccak256Hasher>(labels, cli.command),
        HashKind::Md5 => run_with::<Md5Hasher>(labels, cli.command),
    }
}

/// Gather the labels from the command line, a file, or the demo set, in that order.
pub fn load_labels(params: &TreeParams) -> Result<Vec<String>> {
    if !params.labels.is_empty() {
        return Ok(params.labels.clone());
    }

    let Some(path) = &params.labels_file else {
        debug!("no labels given, using the demo set");
        return Ok(DEMO_LABELS.iter().map(|s| s.to_string()).collect());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read labels from {}", path.display()))?;
    let labels: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    if labels.is_empty() {
        bail!("{} holds no labels", path.display());
    }
    Ok(labels)
}

fn run_with<H: BinaryHash>(labels: Vec<String>, command: Commands) -> Result<()> {
    let tree = Tree::<H>::build(labels)?;
    info!(
        nodes = tree.len(),
        commitment = %hex::encode(tree.commitment()),
        "built tree"
    );

    match command {
        Commands::Commit => println!("{}", hex::encode(tree.commitment())),
        Commands::Prove(params) => prove_single(&tree, params)?,
        Commands::ProveBatch(params) => prove_batch(&tree, params)?,
        Commands::InOrder => {
            for node in tree.in_order() {
                println!("{}", node.key());
            }
        }
    }

    Ok(())
}

fn prove_single<H: BinaryHash>(tree: &Tree<H>, params: prove::Params) -> Result<()> {
    let witness = proof::generate_witness(tree, &params.path)?;
    info!(path = %params.path, entries = witness.len(), "generated witness");
    print_witness(&witness);

    proof::try_verify_single::<H>(tree.commitment(), &witness, &params.path)
        .with_context(|| format!("witness for {} rejected", params.path))?;
    info!(path = %params.path, "witness verified");
    println!("verified");
    Ok(())
}

fn prove_batch<H: BinaryHash>(tree: &Tree<H>, params: prove::BatchParams) -> Result<()> {
    let (hints, max_level) = proof::get_proof_hints(tree, &params.paths)?;
    let witness = proof::generate_batch_witness(tree, &params.paths)?;

    let separate = params
        .paths
        .iter()
        .map(|p| proof::generate_witness(tree, p).map(|w| w.len()))
        .sum::<Result<usize, _>>()?;
    info!(
        paths = params.paths.len(),
        max_level,
        entries = witness.len(),
        separate,
        "generated batch witness"
    );

    for hint in &hints {
        println!(
            "hint    {:>3} {:>5} {:<12} {}",
            hint.level,
            hint.index,
            hint.key,
            hex::encode(&hint.digest)
        );
    }
    print_witness(&witness);

    proof::try_verify_batch::<H, _>(tree.commitment(), &witness, &params.paths, &hints)
        .context("batch witness rejected")?;
    info!("batch witness verified");
    println!("verified");
    Ok(())
}

fn print_witness(witness: &Witness) {
    for entry in witness {
        trace!(level = entry.level, index = entry.index, "witness entry");
        println!("{}", format_entry(entry));
    }
}

fn format_entry(entry: &WitnessNode) -> String {
    format!(
        "witness {:>3} {:>5} {:<12} {}",
        entry.level,
        entry.index,
        entry.key.as_deref().unwrap_or("-"),
        hex::encode(&entry.digest)
    )
}

#[cfg(test)]
mod tests {
    use super::{format_entry, load_labels, run_with};
    use crate::cli::{prove, Commands, HashKind, TreeParams, DEMO_LABELS};
    use hmerkle_core::{hasher::Sha256Hasher, proof::WitnessNode};
    use std::io::Write as _;

    fn params() -> TreeParams {
        TreeParams {
            hasher: HashKind::Sha256,
            labels: Vec::new(),
            labels_file: None,
        }
    }

    fn demo() -> Vec<String> {
        DEMO_LABELS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn demo_labels_by_default() {
        assert_eq!(load_labels(&params()).unwrap(), demo());
    }

    #[test]
    fn labels_from_command_line() {
        let mut p = params();
        p.labels = vec!["a".into(), "b".into()];
        assert_eq!(load_labels(&p).unwrap(), ["a", "b"]);
    }

    #[test]
    fn labels_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "etc\n  pi \n\nchi").unwrap();

        let mut p = params();
        p.labels_file = Some(file.path().to_path_buf());
        assert_eq!(load_labels(&p).unwrap(), ["etc", "pi", "chi"]);
    }

    #[test]
    fn empty_or_missing_file_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut p = params();
        p.labels_file = Some(file.path().to_path_buf());
        assert!(load_labels(&p).is_err());

        p.labels_file = Some(file.path().with_extension("missing"));
        assert!(load_labels(&p).is_err());
    }

    #[test]
    fn commands_succeed_on_demo_tree() {
        run_with::<Sha256Hasher>(demo(), Commands::Commit).unwrap();
        run_with::<Sha256Hasher>(demo(), Commands::InOrder).unwrap();
        run_with::<Sha256Hasher>(
            demo(),
            Commands::Prove(prove::Params {
                path: "etc/pi/ro/opt".into(),
            }),
        )
        .unwrap();
        run_with::<Sha256Hasher>(
            demo(),
            Commands::ProveBatch(prove::BatchParams {
                paths: vec![
                    "etc/pi/ro/opt".into(),
                    "etc/pi/ro/bare".into(),
                    "etc/chi/libnl".into(),
                ],
            }),
        )
        .unwrap();
    }

    #[test]
    fn bad_paths_are_reported() {
        let unknown = run_with::<Sha256Hasher>(
            demo(),
            Commands::Prove(prove::Params {
                path: "etc/usr".into(),
            }),
        );
        assert!(unknown.is_err());

        // internal nodes are not provable as leaves.
        let internal = run_with::<Sha256Hasher>(
            demo(),
            Commands::Prove(prove::Params {
                path: "etc/pi".into(),
            }),
        );
        assert!(internal.is_err());
    }

    #[test]
    fn empty_tree_is_an_error() {
        assert!(run_with::<Sha256Hasher>(Vec::new(), Commands::Commit).is_err());
    }

    #[test]
    fn absent_entries_are_marked() {
        let line = format_entry(&WitnessNode::absent(3, 3));
        assert!(line.contains(" - "));
        assert!(line.starts_with("witness   3     3"));
    }
}
