use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "kotrans")]
#[command(about = "Korean-to-English desktop translator backed by a local NLLB-200 model")]
#[command(
    long_about = "Korean-to-English desktop translator backed by a local NLLB-200 model.\n\n\
                  Opens a window with an input pane and a translation pane. The model is \
                  downloaded from the Hugging Face hub on first run.\n\n\
                  Optional settings are read from ~/.config/kotrans/config.toml:\n\n  \
                  [translator]\n  \
                  model_id = \"Xenova/nllb-200-distilled-600M\"\n  \
                  source_lang = \"kor_Hang\"\n  \
                  target_lang = \"eng_Latn\"\n  \
                  max_length = 250\n  \
                  num_beams = 4"
)]
#[command(version)]
pub struct Args {}
