// End-to-end checks: raw CLEVR files → index build → dataset views
// → burn data loaders, plus the Sort-of-CLEVR path.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use burn::backend::NdArray;
use image::{Rgb, RgbImage};

use vqa_data::application::build_index_use_case::BuildIndexUseCase;
use vqa_data::application::config::{DataConfig, DatasetKind};
use vqa_data::application::inspect_use_case::InspectUseCase;
use vqa_data::data::annotations::{annotation_path, image_dir};
use vqa_data::data::clevr_dataset::ClevrDataset;
use vqa_data::data::dataloaders::{loader, test_loader, train_loader, VqaBatches};
use vqa_data::data::encoder::decode_question;
use vqa_data::data::sort_of_clevr::{
    OneHotLayout, QuestionGroup, SceneImage, SceneRecord, SortOfClevrArtifact, NON_RELATIONAL,
    RELATIONAL,
};
use vqa_data::domain::error::DatasetError;
use vqa_data::domain::split::Split;
use vqa_data::domain::vocabulary::{EOS_ID, SOS_ID};
use vqa_data::infra::image_loader::RgbImageLoader;
use vqa_data::infra::index_store::IndexStore;

type TestBackend = NdArray;

const TRAIN: &[(&str, &str, &str)] = &[
    ("CLEVR_train_000000.png", "Are there any   red cubes?", "yes"),
    ("CLEVR_train_000000.png", "How many spheres are there?", "2"),
    ("CLEVR_train_000001.png", "What shape is the large metal object?", "cube"),
];
const VAL: &[(&str, &str, &str)] = &[
    ("CLEVR_val_000000.png", "What color is the tiny cylinder?", "Purple"),
    ("CLEVR_val_000000.png", "Is the cylinder rubber?", "no"),
];
const SAMPLE: &[(&str, &str, &str)] = &[
    ("CLEVR_train_000001.png", "Is there a cube?", "yes"),
];

fn write_split(root: &Path, split: Split, records: &[(&str, &str, &str)]) {
    let questions: Vec<serde_json::Value> = records
        .iter()
        .map(|(img, q, a)| serde_json::json!({
            "image_filename": img,
            "question": q,
            "answer": a,
            "question_family_index": 0,
        }))
        .collect();

    let path = annotation_path(root, split);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::json!({ "info": {}, "questions": questions }).to_string()).unwrap();

    let dir = image_dir(root, split);
    fs::create_dir_all(&dir).unwrap();
    for (img, _, _) in records {
        RgbImage::from_pixel(8, 6, Rgb([10, 20, 30])).save(dir.join(img)).unwrap();
    }
}

fn clevr_fixture(data_dir: &Path) -> DataConfig {
    let cfg = DataConfig {
        data_directory: data_dir.to_string_lossy().into_owned(),
        batch_size: 2,
        input_h: 4,
        input_w: 4,
        ..DataConfig::default()
    };
    let root = cfg.clevr_root();
    write_split(&root, Split::Train, TRAIN);
    write_split(&root, Split::Val, VAL);
    write_split(&root, Split::Sample, SAMPLE);
    cfg
}

#[test]
fn build_then_open_every_split() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = clevr_fixture(dir.path());
    let root = cfg.clevr_root();

    let summary = BuildIndexUseCase::all_splits(&root).execute().unwrap();
    assert_eq!(summary.examples_per_split[&Split::Train], TRAIN.len());
    assert_eq!(summary.answer_vocab_size, 5); // yes 2 cube purple no

    for (split, raw) in [(Split::Train, TRAIN), (Split::Val, VAL), (Split::Sample, SAMPLE)] {
        let ds = ClevrDataset::open(&root, split, Arc::new(RgbImageLoader::new())).unwrap();
        assert_eq!(ds.len(), raw.len());
        assert_eq!(ds.q_size(), summary.question_vocab_size);

        for i in 0..ds.len() {
            let item = ds.item(i).unwrap();
            assert_eq!(item.question[0], SOS_ID);
            assert_eq!(*item.question.last().unwrap(), EOS_ID);
            assert_eq!(item.image.shape(), [3, 6, 8]);
        }
        assert!(matches!(ds.item(ds.len()), Err(DatasetError::IndexOutOfRange { .. })));
    }

    // validation-only words were indexed and decode back
    let val = ClevrDataset::open(&root, Split::Val, Arc::new(RgbImageLoader::new())).unwrap();
    let first = val.item(0).unwrap();
    assert_eq!(
        decode_question(&first.question, val.question_vocabulary()),
        "what color is the tiny cylinder"
    );
    assert_eq!(val.answer_vocabulary().token(first.answer), Some("purple"));
}

#[test]
fn missing_split_file_aborts_build_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = clevr_fixture(dir.path());
    let root = cfg.clevr_root();
    fs::remove_file(annotation_path(&root, Split::Sample)).unwrap();

    assert!(BuildIndexUseCase::all_splits(&root).execute().is_err());
    assert!(!IndexStore::new(&root).vocabulary_path().exists());
}

#[test]
fn deleted_image_only_affects_its_item() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = clevr_fixture(dir.path());
    let root = cfg.clevr_root();
    BuildIndexUseCase::all_splits(&root).execute().unwrap();

    fs::remove_file(image_dir(&root, Split::Train).join("CLEVR_train_000001.png")).unwrap();
    let ds = ClevrDataset::open(&root, Split::Train, Arc::new(RgbImageLoader::new())).unwrap();
    assert!(ds.item(0).is_ok());
    assert!(ds.item(1).is_ok());
    assert!(matches!(ds.item(2), Err(DatasetError::ImageNotFound { .. })));
}

#[test]
fn deleted_image_does_not_end_the_epoch() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = DataConfig { batch_size: 1, ..clevr_fixture(dir.path()) };
    let root = cfg.clevr_root();
    BuildIndexUseCase::all_splits(&root).execute().unwrap();

    // items 0 and 1 share this image; item 2 must still be served
    fs::remove_file(image_dir(&root, Split::Train).join("CLEVR_train_000000.png")).unwrap();

    let loaded = train_loader::<TestBackend>(&cfg, Default::default()).unwrap();
    assert_eq!(loaded.len, TRAIN.len());
    let VqaBatches::Clevr(batches) = loaded.batches else {
        panic!("expected CLEVR batches");
    };

    let mut batch_count = 0;
    let mut served = 0;
    for batch in batches.iter() {
        batch_count += 1;
        served += batch.answers.dims()[0];
    }
    assert_eq!(batch_count, TRAIN.len());
    assert_eq!(served, 1);
}

#[test]
fn clevr_loader_yields_padded_batches() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = clevr_fixture(dir.path());
    BuildIndexUseCase::all_splits(cfg.clevr_root()).execute().unwrap();

    let loaded = train_loader::<TestBackend>(&cfg, Default::default()).unwrap();
    assert_eq!(loaded.len, TRAIN.len());
    assert_eq!(loaded.sizes.c_size, None);

    let VqaBatches::Clevr(batches) = loaded.batches else {
        panic!("expected CLEVR batches");
    };
    let mut seen = 0;
    for batch in batches.iter() {
        let [n, c, h, w] = batch.images.dims();
        assert_eq!([c, h, w], [3, 4, 4]);
        assert_eq!(batch.questions.dims()[0], n);
        assert_eq!(batch.answers.dims(), [n]);
        seen += n;
    }
    assert_eq!(seen, TRAIN.len());

    let val = test_loader::<TestBackend>(&cfg, Default::default()).unwrap();
    assert_eq!(val.len, VAL.len());
}

#[test]
fn loader_without_index_reports_missing_index() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = clevr_fixture(dir.path());
    let err = train_loader::<TestBackend>(&cfg, Default::default()).err().unwrap();
    let missing = err
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<DatasetError>(), Some(DatasetError::MissingIndex { .. })));
    assert!(missing, "unexpected error: {err:#}");
}

fn sort_of_clevr_artifact(scenes: usize) -> SortOfClevrArtifact {
    let one_hot = |active: [usize; 3]| {
        let mut v = vec![0u8; 11];
        for i in active {
            v[i] = 1;
        }
        v
    };
    let scene = SceneRecord {
        image: SceneImage { height: 5, width: 5, channels: 3, pixels: vec![51; 75] },
        non_relational: QuestionGroup {
            questions: (0..18).map(|i| one_hot([i % 6, 6, 8 + i % 3])).collect(),
            answers:   vec![0; 18],
        },
        relational: QuestionGroup {
            questions: (0..30).map(|i| one_hot([i % 6, 7, 8 + i % 3])).collect(),
            answers:   vec![1; 30],
        },
    };
    SortOfClevrArtifact {
        colors:         ["red", "green", "blue", "orange", "gray", "yellow"].map(String::from).to_vec(),
        question_types: ["shape", "horizontal", "vertical", "closest", "furthest", "count"].map(String::from).to_vec(),
        answers:        ["yes", "no", "rectangle", "circle"].map(String::from).to_vec(),
        layout:         OneHotLayout::default(),
        non_relational: NON_RELATIONAL,
        relational:     RELATIONAL,
        scenes:         vec![scene; scenes],
    }
}

#[test]
fn sort_of_clevr_loader_and_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = DataConfig {
        dataset: DatasetKind::SortOfClevr,
        data_directory: dir.path().to_string_lossy().into_owned(),
        batch_size: 16,
        ..DataConfig::default()
    };
    let gen_dir = cfg.sort_of_clevr_dir();
    sort_of_clevr_artifact(2).save(&gen_dir.join(SortOfClevrArtifact::file_name(Split::Train))).unwrap();

    let loaded = loader::<TestBackend>(&cfg, Split::Train, Default::default()).unwrap();
    assert_eq!(loaded.len, 96);
    assert_eq!(loaded.sizes.c_size, Some(6));

    let VqaBatches::SortOfClevr(batches) = loaded.batches else {
        panic!("expected Sort-of-CLEVR batches");
    };
    let total: usize = batches.iter().map(|b| b.questions.dims()[0]).sum();
    assert_eq!(total, 96);

    // flat index 18 is the first relational question of scene 0
    let report = InspectUseCase::new(cfg, Split::Train).execute(Some(18)).unwrap();
    assert_eq!(report.question, "red / closest");
    assert_eq!(report.answer, "no");
    assert_eq!(report.image_shape, [3, 5, 5]);
}
