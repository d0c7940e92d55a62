//! SSML construction for Azure Speech synthesis
//!
//! Two shapes are produced: Personal Voice synthesis (the
//! `mstts:ttsembedding` element applies the speaker profile) and catalog
//! previews with prosody controls. Every interpolated value is XML-escaped.

/// Escape a string for embedding in SSML text or attribute position.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Build SSML for Personal Voice synthesis.
///
/// The `mstts:ttsembedding` tag is what applies the Personal Voice speaker
/// profile; `voice_name` stays the base model voice.
#[must_use]
pub fn personal_voice_ssml(
    text: &str,
    speaker_profile_id: &str,
    voice_name: &str,
    language: &str,
) -> String {
    let safe_text = escape_xml(text);
    let safe_profile = escape_xml(speaker_profile_id);
    let safe_voice = escape_xml(voice_name);
    let safe_lang = escape_xml(language);

    // Keep this in a predictable, single-line format the service accepts.
    format!(
        "<speak version='1.0' \
         xmlns='http://www.w3.org/2001/10/synthesis' \
         xml:lang='{safe_lang}' \
         xmlns:mstts='http://www.w3.org/2001/mstts'>\
         <voice name='{safe_voice}'>\
         <mstts:ttsembedding speakerProfileId='{safe_profile}'>\
         <lang xml:lang='{safe_lang}'>{safe_text}</lang>\
         </mstts:ttsembedding>\
         </voice>\
         </speak>"
    )
}

/// Prosody controls for catalog voice previews.
///
/// Slider values are centered on 1.0; the conversions below turn them into
/// the relative units SSML expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prosody {
    /// Speaking rate multiplier (0.5 - 2.0)
    pub rate: f32,
    /// Pitch multiplier (0.5 - 2.0)
    pub pitch: f32,
    /// Volume multiplier (0.5 - 2.0)
    pub volume: f32,
}

impl Default for Prosody {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl Prosody {
    /// Rate expressed as a signed percentage offset
    #[must_use]
    pub fn rate_percent(&self) -> f32 {
        (self.rate - 1.0) * 100.0
    }

    /// Pitch expressed as signed semitones
    #[must_use]
    pub fn pitch_semitones(&self) -> f32 {
        (self.pitch - 1.0) * 10.0
    }

    /// Volume expressed as signed decibels
    #[must_use]
    pub fn volume_db(&self) -> f32 {
        (self.volume - 1.0) * 10.0
    }
}

/// Build SSML for a catalog voice preview with prosody controls.
#[must_use]
pub fn prosody_ssml(voice_name: &str, locale: &str, text: &str, prosody: &Prosody) -> String {
    let safe_voice = escape_xml(voice_name);
    let safe_locale = escape_xml(locale);
    let safe_text = escape_xml(text);

    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' \
         xmlns:mstts='https://www.w3.org/2001/mstts' xml:lang='{safe_locale}'>\n\
         \x20 <voice name='{safe_voice}'>\n\
         \x20   <prosody rate='{rate:+.0}%' pitch='{pitch:+.0}st' volume='{volume:+.0}dB'>\n\
         \x20     {safe_text}\n\
         \x20   </prosody>\n\
         \x20 </voice>\n\
         </speak>",
        rate = prosody.rate_percent(),
        pitch = prosody.pitch_semitones(),
        volume = prosody.volume_db(),
    )
}
